use std::io::{self, BufRead, Write};

/// Answer to the "resource changed" dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseChoice {
    Save,
    Discard,
    Cancel,
}

/// Synchronous questions a session may ask the user.
pub trait Prompt {
    /// "File size is N bytes. Do you really want to load it as text?"
    fn confirm_large_text(&mut self, size: u64) -> bool;

    /// "Save changes to <location>?" with Save / Discard / Cancel.
    fn choose_close_action(&mut self, location: &str) -> CloseChoice;
}

/// Prompt that asks on a terminal.
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompt<io::StdinLock<'static>, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, question: &str) -> String {
        let _ = write!(self.output, "{} ", question);
        let _ = self.output.flush();
        let mut line = String::new();
        // EOF or a read error reads as an empty answer
        if self.input.read_line(&mut line).is_err() {
            line.clear();
        }
        line.trim().to_lowercase()
    }
}

impl<R: BufRead, W: Write> Prompt for ConsolePrompt<R, W> {
    fn confirm_large_text(&mut self, size: u64) -> bool {
        let answer = self.ask(&format!(
            "File size is {} bytes. Do you really want to load the file into the text editor? [y/N]",
            size
        ));
        matches!(answer.as_str(), "y" | "yes")
    }

    fn choose_close_action(&mut self, location: &str) -> CloseChoice {
        let answer = self.ask(&format!(
            "Save changes to {}? [s]ave / [d]iscard / [c]ancel",
            location
        ));
        match answer.as_str() {
            "s" | "save" => CloseChoice::Save,
            "d" | "discard" => CloseChoice::Discard,
            _ => CloseChoice::Cancel,
        }
    }
}
