//! Minimal interactive prompts.
//!
//! Line-based input works with piped stdin as well; password entry
//! switches the terminal to raw mode to mask what is typed.

use std::io::{self, BufRead, IsTerminal, Write};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::style::Stylize;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

fn ask(message: &str, hint: Option<&str>) -> io::Result<String> {
    let mut stdout = io::stdout();
    match hint {
        Some(hint) => write!(stdout, "{} {} {} ", "?".green(), message.bold(), hint.dark_grey())?,
        None => write!(stdout, "{} {} ", "?".green(), message.bold())?,
    }
    stdout.flush()?;
    read_line()
}

fn read_line() -> io::Result<String> {
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Free text; an empty answer yields `default` (or an empty string).
pub fn input(message: &str, default: Option<&str>) -> io::Result<String> {
    let hint = default.map(|d| format!("({})", d));
    let answer = ask(message, hint.as_deref())?;
    if answer.trim().is_empty() {
        return Ok(default.unwrap_or_default().to_string());
    }
    Ok(answer)
}

/// Free text re-asked until `validate` accepts it.
pub fn input_with<T, F>(message: &str, default: Option<&str>, validate: F) -> io::Result<T>
where
    F: Fn(&str) -> Result<T, String>,
{
    loop {
        let answer = input(message, default)?;
        match validate(&answer) {
            Ok(value) => return Ok(value),
            Err(reason) => println!("{} {}", ">>".red(), reason.red()),
        }
    }
}

/// Yes/no question.
pub fn confirm(message: &str, default: bool) -> io::Result<bool> {
    let hint = if default { "(Y/n)" } else { "(y/N)" };
    loop {
        let answer = ask(message, Some(hint))?;
        match answer.trim().to_lowercase().as_str() {
            "" => return Ok(default),
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => println!("{}", "Please answer y or n.".red()),
        }
    }
}

/// Pick one of `items` by number. Returns the chosen index.
pub fn select(message: &str, items: &[String], default: usize) -> io::Result<usize> {
    println!("{} {}", "?".green(), message.bold());
    for (i, item) in items.iter().enumerate() {
        let marker = if i == default { "❯" } else { " " };
        println!("{} {}) {}", marker.cyan(), i + 1, item);
    }

    loop {
        let answer = ask("Choice", Some(&format!("({})", default + 1)))?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Ok(default);
        }
        match answer.parse::<usize>() {
            Ok(n) if (1..=items.len()).contains(&n) => return Ok(n - 1),
            _ => println!(
                "{}",
                format!("Enter a number between 1 and {}.", items.len()).red()
            ),
        }
    }
}

/// Restores cooked mode even if reading fails.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Secret input echoed as `*`. Falls back to a plain line read when
/// stdin is not a terminal.
pub fn password(message: &str) -> io::Result<String> {
    if !io::stdin().is_terminal() {
        return ask(message, None);
    }

    let mut stdout = io::stdout();
    write!(stdout, "{} {} ", "?".green(), message.bold())?;
    stdout.flush()?;

    let mut secret = String::new();
    {
        let _raw = RawModeGuard::enable()?;
        loop {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Enter => break,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Err(io::Error::new(io::ErrorKind::Interrupted, "cancelled"));
                }
                KeyCode::Backspace => {
                    if secret.pop().is_some() {
                        write!(stdout, "\x08 \x08")?;
                    }
                }
                KeyCode::Char(c) => {
                    secret.push(c);
                    write!(stdout, "*")?;
                }
                _ => {}
            }
            stdout.flush()?;
        }
    }
    writeln!(stdout)?;
    Ok(secret)
}
