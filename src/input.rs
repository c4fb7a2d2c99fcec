//! Key bindings.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    HardDrop,
    Restart,
    Quit,
}

pub fn command_for(key: KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(Command::Quit),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Restart),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Command::MoveLeft),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Command::MoveRight),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Command::SoftDrop),
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Command::Rotate),
        KeyCode::Char(' ') => Some(Command::HardDrop),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, KeyModifiers};

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn arrows_and_letters_map_to_the_same_commands() {
        let pairs = [
            (KeyCode::Left, KeyCode::Char('a'), Command::MoveLeft),
            (KeyCode::Right, KeyCode::Char('d'), Command::MoveRight),
            (KeyCode::Down, KeyCode::Char('s'), Command::SoftDrop),
            (KeyCode::Up, KeyCode::Char('w'), Command::Rotate),
        ];
        for (arrow, letter, command) in pairs {
            assert_eq!(command_for(key(arrow, KeyEventKind::Press)), Some(command));
            assert_eq!(command_for(key(letter, KeyEventKind::Press)), Some(command));
        }
    }

    #[test]
    fn space_restart_and_quit() {
        assert_eq!(
            command_for(key(KeyCode::Char(' '), KeyEventKind::Press)),
            Some(Command::HardDrop)
        );
        assert_eq!(
            command_for(key(KeyCode::Char('r'), KeyEventKind::Press)),
            Some(Command::Restart)
        );
        assert_eq!(
            command_for(key(KeyCode::Esc, KeyEventKind::Press)),
            Some(Command::Quit)
        );
    }

    #[test]
    fn releases_and_unbound_keys_are_ignored() {
        assert_eq!(command_for(key(KeyCode::Left, KeyEventKind::Release)), None);
        assert_eq!(command_for(key(KeyCode::Char('x'), KeyEventKind::Press)), None);
    }
}
