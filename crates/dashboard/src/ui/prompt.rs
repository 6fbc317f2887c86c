//! Password entry. Passwords are never taken from flags or the environment.
use std::io::{BufRead, IsTerminal, Write};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    style::Print,
    terminal::{self, ClearType},
};

use crate::error::{AppError, Result};

const CONFIRM_ATTEMPTS: usize = 3;

/// Keeps raw mode on for as long as it lives.
struct RawMode;

impl RawMode {
    fn enable() -> Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// What the terminal should show after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Echo {
    Nothing,
    Mask,
    Erase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Typing(Echo),
    Submitted,
    Cancelled,
}

/// Line buffer that never echoes what it holds.
#[derive(Debug, Default)]
struct MaskedLine {
    secret: String,
}

impl MaskedLine {
    fn press(&mut self, key: KeyEvent) -> Step {
        if key.kind == KeyEventKind::Release {
            return Step::Typing(Echo::Nothing);
        }
        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter => Step::Submitted,
            KeyCode::Char('c' | 'd') if control => Step::Cancelled,
            KeyCode::Esc => Step::Cancelled,
            KeyCode::Backspace => match self.secret.pop() {
                Some(_) => Step::Typing(Echo::Erase),
                None => Step::Typing(Echo::Nothing),
            },
            KeyCode::Char(ch) if !control => {
                self.secret.push(ch);
                Step::Typing(Echo::Mask)
            }
            _ => Step::Typing(Echo::Nothing),
        }
    }
}

/// Reads a password without echoing it.
///
/// On a terminal every typed character shows as `*`. When stdin is piped the
/// first line is read as-is, so scripted logins keep working.
pub fn password(label: &str) -> Result<String> {
    if !std::io::stdin().is_terminal() {
        return piped_line();
    }

    let _raw = RawMode::enable()?;
    let mut err = std::io::stderr();
    execute!(
        err,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(label)
    )?;

    let mut line = MaskedLine::default();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        match line.press(key) {
            Step::Typing(Echo::Nothing) => continue,
            Step::Typing(Echo::Mask) => execute!(err, Print("*"))?,
            Step::Typing(Echo::Erase) => {
                execute!(err, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
            }
            Step::Submitted => {
                execute!(err, Print("\r\n"))?;
                return Ok(line.secret);
            }
            Step::Cancelled => {
                execute!(err, Print("\r\n"))?;
                return Err(AppError::Terminal("password entry cancelled".to_string()));
            }
        }
        err.flush()?;
    }
}

fn piped_line() -> Result<String> {
    let mut raw = String::new();
    std::io::stdin().lock().read_line(&mut raw)?;
    Ok(raw.trim_end_matches(['\r', '\n']).to_string())
}

/// Asks for a new password and its confirmation.
pub fn new_password() -> Result<String> {
    confirmed(password, |warning| eprintln!("{warning}"))
}

/// Runs `read` until two non-empty entries agree, at most
/// [`CONFIRM_ATTEMPTS`] times.
fn confirmed<R, W>(mut read: R, mut warn: W) -> Result<String>
where
    R: FnMut(&str) -> Result<String>,
    W: FnMut(&str),
{
    for _ in 0..CONFIRM_ATTEMPTS {
        let first = read("Nova senha: ")?;
        if first.is_empty() {
            warn("A senha não pode ser vazia.");
            continue;
        }
        if read("Confirme a senha: ")? == first {
            return Ok(first);
        }
        warn("As senhas não conferem. Tente novamente.");
    }
    Err(AppError::Terminal("password confirmation failed".to_string()))
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    #[test]
    fn typed_characters_are_masked_and_erasable() {
        let mut line = MaskedLine::default();
        assert_eq!(line.press(key(KeyCode::Char('a'))), Step::Typing(Echo::Mask));
        assert_eq!(line.press(key(KeyCode::Char('b'))), Step::Typing(Echo::Mask));
        assert_eq!(line.press(key(KeyCode::Backspace)), Step::Typing(Echo::Erase));
        assert_eq!(line.press(key(KeyCode::Char('c'))), Step::Typing(Echo::Mask));
        assert_eq!(line.press(key(KeyCode::Enter)), Step::Submitted);
        assert_eq!(line.secret, "ac");
    }

    #[test]
    fn backspace_on_empty_line_echoes_nothing() {
        let mut line = MaskedLine::default();
        assert_eq!(
            line.press(key(KeyCode::Backspace)),
            Step::Typing(Echo::Nothing)
        );
    }

    #[test]
    fn key_releases_are_ignored() {
        let mut line = MaskedLine::default();
        let mut release = key(KeyCode::Char('x'));
        release.kind = KeyEventKind::Release;
        assert_eq!(line.press(release), Step::Typing(Echo::Nothing));
        assert!(line.secret.is_empty());
    }

    #[test]
    fn control_keys_cancel_without_storing() {
        for cancel in [ctrl('c'), ctrl('d'), key(KeyCode::Esc)] {
            let mut line = MaskedLine::default();
            assert_eq!(line.press(cancel), Step::Cancelled);
            assert!(line.secret.is_empty());
        }
        let mut line = MaskedLine::default();
        assert_eq!(line.press(ctrl('u')), Step::Typing(Echo::Nothing));
    }

    fn scripted(entries: &[&str]) -> impl FnMut(&str) -> Result<String> {
        let mut queue: VecDeque<String> = entries.iter().map(|e| e.to_string()).collect();
        move |_: &str| {
            queue
                .pop_front()
                .ok_or_else(|| AppError::Terminal("no more input".to_string()))
        }
    }

    #[test]
    fn confirmation_retries_after_mismatch_and_empty_entry() {
        let mut warnings = Vec::new();
        let secret = confirmed(scripted(&["", "abc", "abd", "abc", "abc"]), |w| {
            warnings.push(w.to_string())
        })
        .unwrap();
        assert_eq!(secret, "abc");
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn confirmation_gives_up_after_three_attempts() {
        let result = confirmed(scripted(&["a", "b", "c", "d", "e", "f"]), |_| {});
        assert!(matches!(result, Err(AppError::Terminal(_))));
    }
}
