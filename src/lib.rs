pub mod app;
pub mod config;
pub mod formation;
pub mod game;
pub mod input;
pub mod playfield;
pub mod ui;
