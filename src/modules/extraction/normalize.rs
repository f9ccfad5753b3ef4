use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Control characters other than tab, line feed and carriage return
    static ref CONTROL_CHARS: Regex = Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]").unwrap();
    static ref SPACE_RUNS: Regex = Regex::new(r" +").unwrap();
    static ref BLANK_LINE_RUNS: Regex = Regex::new(r"\n\s*\n\s*\n+").unwrap();
}

/// Normalize extracted text
///
/// Removes control characters, collapses runs of spaces, squeezes three or
/// more consecutive line breaks into one blank line, then trims every line
/// and the whole text.
pub fn normalize_text(text: &str) -> String {
    let text = CONTROL_CHARS.replace_all(text, "");
    let text = SPACE_RUNS.replace_all(&text, " ");
    let text = BLANK_LINE_RUNS.replace_all(&text, "\n\n");

    text.split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_spaces_and_blank_lines() {
        let input = "  Judul   Laporan  \n\n\n\n  Isi    pertama \n\n\nIsi kedua  ";
        assert_eq!(
            normalize_text(input),
            "Judul Laporan\n\nIsi pertama\n\nIsi kedua"
        );
    }

    #[test]
    fn test_removes_control_characters_but_keeps_tabs() {
        assert_eq!(normalize_text("a\x00b\x07c\td\x7f"), "abc\td");
    }

    #[test]
    fn test_strips_carriage_returns_at_line_ends() {
        assert_eq!(normalize_text("baris 1\r\nbaris 2\r\n"), "baris 1\nbaris 2");
    }

    #[test]
    fn test_keeps_single_blank_line() {
        assert_eq!(normalize_text("a\n\nb"), "a\n\nb");
        assert_eq!(normalize_text("a\n  \nb"), "a\n\nb");
    }

    #[test]
    fn test_whitespace_only_becomes_empty() {
        assert_eq!(normalize_text(" \n \t \n"), "");
    }
}
