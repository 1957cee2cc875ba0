use std::path::Path;

/// Extract filename from a file path
///
/// Returns the filename component of a path, or "Unknown" if it can't be extracted.
pub fn extract_filename(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|s| !s.is_empty() && *s != ".")
        .map(|s| s.to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Convert a character index into a 1-based (line, column) pair.
///
/// Indices past the end of the text are clamped to the end.
pub fn caret_line_col(text: &str, caret: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for ch in text.chars().take(caret) {
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

/// Status bar text for a caret: `"line:col"`.
pub fn cursor_status(text: &str, caret: usize) -> String {
    let (line, col) = caret_line_col(text, caret);
    format!("{}:{}", line, col)
}

/// Status bar text for a byte offset.
pub fn offset_status(offset: u64) -> String {
    format!("Offset: 0x{:X}", offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_filename_from_path() {
        assert_eq!(extract_filename("/games/bg2/override/AR0100.ARE"), "AR0100.ARE");
        assert_eq!(extract_filename("test.txt"), "test.txt");
        assert_eq!(extract_filename("/path/with/many/levels/file.rs"), "file.rs");
    }

    #[test]
    fn test_extract_filename_edge_cases() {
        assert_eq!(extract_filename("/home/user/"), "user");
        assert_eq!(extract_filename(""), "Unknown");
        assert_eq!(extract_filename("."), "Unknown");
        assert_eq!(extract_filename("/"), "Unknown");
    }

    #[test]
    fn test_caret_line_col() {
        let text = "first\nsecond\n\nfourth";
        assert_eq!(caret_line_col(text, 0), (1, 1));
        assert_eq!(caret_line_col(text, 5), (1, 6));
        assert_eq!(caret_line_col(text, 6), (2, 1));
        assert_eq!(caret_line_col(text, 13), (3, 1));
        assert_eq!(caret_line_col(text, 14), (4, 1));
        assert_eq!(caret_line_col(text, 1000), (4, 7));
    }

    #[test]
    fn test_caret_counts_characters_not_bytes() {
        assert_eq!(caret_line_col("äöü", 2), (1, 3));
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(cursor_status("a\nbc", 3), "2:2");
        assert_eq!(offset_status(255), "Offset: 0xFF");
    }
}
