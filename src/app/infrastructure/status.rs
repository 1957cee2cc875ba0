use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Status bar of the host window, handed to each session.
pub trait StatusReporter {
    /// Cursor position field, e.g. `"12:4"`. Empty clears it.
    fn set_cursor_text(&mut self, text: &str);

    fn report(&mut self, level: StatusLevel, message: &str);
}

/// Reporter for headless use: everything goes to the log.
#[derive(Debug, Default)]
pub struct LogStatus {
    cursor_text: String,
}

impl LogStatus {
    pub fn cursor_text(&self) -> &str {
        &self.cursor_text
    }
}

impl StatusReporter for LogStatus {
    fn set_cursor_text(&mut self, text: &str) {
        self.cursor_text = text.to_string();
    }

    fn report(&mut self, level: StatusLevel, message: &str) {
        match level {
            StatusLevel::Info => info!("{}", message),
            StatusLevel::Warning => warn!("{}", message),
            StatusLevel::Error => error!("{}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_status_keeps_cursor_text() {
        let mut status = LogStatus::default();
        status.set_cursor_text("3:7");
        status.report(StatusLevel::Warning, "something odd");
        assert_eq!(status.cursor_text(), "3:7");
        status.set_cursor_text("");
        assert_eq!(status.cursor_text(), "");
    }
}
