use anyhow::Result;
use clap::Parser;

use blockfall::app::App;
use blockfall::config::{Args, Settings};

fn main() -> Result<()> {
    // stdout belongs to the UI; logs go to stderr and are off unless RUST_LOG is set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();

    let args = Args::parse();
    let settings = Settings::from_args(&args)?;
    App::new(settings).run()
}
