//! User-facing dialogs: messages, yes/no consent and directory choice

use crate::display::render_dialog;
use crate::error::Result;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Everything an action needs from the person at the keyboard
pub trait Dialogs {
    fn show(&mut self, title: &str, message: &str);

    /// Ask a yes/no question; anything but yes is a no
    fn confirm(&mut self, prompt: &str) -> bool;

    /// Ask for an existing directory; `None` when the user backs out
    fn choose_directory(&mut self) -> Option<PathBuf>;
}

/// Dialogs on a terminal: framed text out, lines in
pub struct TerminalDialogs<R, W> {
    input: R,
    output: W,
}

impl TerminalDialogs<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalDialogs<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print a prompt and read one trimmed line; `None` at end of input
    pub fn prompt(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }
}

impl<R: BufRead, W: Write> Dialogs for TerminalDialogs<R, W> {
    fn show(&mut self, title: &str, message: &str) {
        if let Err(err) = writeln!(self.output, "{}", render_dialog(title, message)) {
            tracing::warn!(error = %err, "could not write dialog");
        }
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        match self.prompt(&format!("{} [y/N]: ", prompt)) {
            Ok(Some(answer)) => matches!(answer.to_lowercase().as_str(), "y" | "yes"),
            Ok(None) => false,
            Err(err) => {
                tracing::warn!(error = %err, "could not read answer");
                false
            }
        }
    }

    fn choose_directory(&mut self) -> Option<PathBuf> {
        loop {
            let answer = match self.prompt("Log directory (empty to cancel): ") {
                Ok(Some(answer)) if !answer.is_empty() => answer,
                Ok(_) => return None,
                Err(err) => {
                    tracing::warn!(error = %err, "could not read directory");
                    return None;
                }
            };

            let path = PathBuf::from(shellexpand::tilde(&answer).to_string());
            if path.is_dir() {
                return Some(path);
            }
            self.show("Choose Log Location", &format!("Not a directory: {}", path.display()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn dialogs(input: &str) -> TerminalDialogs<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalDialogs::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn confirm_accepts_yes_only() {
        assert!(dialogs("y\n").confirm("Do you want to check for updates?"));
        assert!(dialogs("YES\n").confirm("?"));
        assert!(!dialogs("\n").confirm("?"));
        assert!(!dialogs("nope\n").confirm("?"));
        assert!(!dialogs("").confirm("?"));
    }

    #[test]
    fn choose_directory_retries_until_valid() {
        let dir = tempfile::tempdir().unwrap();
        let input = format!("/definitely/not/here\n{}\n", dir.path().display());
        let mut d = dialogs(&input);

        assert_eq!(d.choose_directory(), Some(dir.path().to_path_buf()));
        let shown = String::from_utf8(d.output().clone()).unwrap();
        assert!(shown.contains("Not a directory: /definitely/not/here"));
    }

    #[test]
    fn empty_directory_answer_cancels() {
        assert_eq!(dialogs("\n").choose_directory(), None);
        assert_eq!(dialogs("").choose_directory(), None);
    }

    #[test]
    fn show_writes_title_and_message() {
        let mut d = dialogs("");
        d.show("Update Information", "sudo pacman -Syu");
        let shown = String::from_utf8(d.output().clone()).unwrap();
        assert!(shown.contains("Update Information"));
        assert!(shown.contains("sudo pacman -Syu"));
    }
}
