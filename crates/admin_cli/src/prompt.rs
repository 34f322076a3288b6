//! Hidden password input on the controlling terminal.

use std::io::{Stderr, Write};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal::{self, ClearType},
};

type PromptResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

const MAX_ATTEMPTS: usize = 3;

/// Restores cooked mode even when reading fails midway.
struct RawMode;

impl RawMode {
    fn enable() -> PromptResult<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

enum Key {
    Submit,
    Erase,
    Abort,
    Push(char),
    Ignore,
}

impl From<KeyEvent> for Key {
    fn from(event: KeyEvent) -> Self {
        let control = event.modifiers.contains(KeyModifiers::CONTROL);
        match event.code {
            KeyCode::Enter => Key::Submit,
            KeyCode::Backspace => Key::Erase,
            KeyCode::Char('c') | KeyCode::Char('d') if control => Key::Abort,
            KeyCode::Char(ch) if !control => Key::Push(ch),
            _ => Key::Ignore,
        }
    }
}

fn line(out: &mut Stderr, text: &str) -> PromptResult<()> {
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(text)
    )?;
    Ok(())
}

/// Reads one line without echoing it, printing `*` per character.
fn read_hidden(label: &str) -> PromptResult<String> {
    let _raw = RawMode::enable()?;
    let mut out = std::io::stderr();
    line(&mut out, label)?;

    let mut secret = String::new();
    loop {
        let Event::Key(event) = event::read()? else {
            continue;
        };
        match Key::from(event) {
            Key::Submit => break,
            Key::Abort => {
                execute!(out, Print("\r\n"))?;
                return Err("interrupted".into());
            }
            Key::Erase if secret.pop().is_some() => {
                execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
            }
            Key::Push(ch) => {
                secret.push(ch);
                execute!(out, Print("*"))?;
            }
            Key::Erase | Key::Ignore => {}
        }
    }
    execute!(out, Print("\r\n"))?;
    out.flush()?;

    Ok(secret)
}

/// Asks for a new non-empty password twice until both entries match.
pub fn new_password() -> PromptResult<String> {
    let mut out = std::io::stderr();
    for _ in 0..MAX_ATTEMPTS {
        let password = read_hidden("Password: ")?;
        if password.is_empty() {
            line(&mut out, "Password must not be empty.\r\n")?;
            continue;
        }
        if password == read_hidden("Confirm password: ")? {
            return Ok(password);
        }
        line(&mut out, "Passwords do not match. Try again.\r\n")?;
    }

    Err("too many attempts".into())
}
