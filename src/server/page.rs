//! Embedded terminal page

/// Browser terminal served at `/`; the page-side session mirrors the
/// native client byte for byte
pub const TERMINAL_PAGE: &str = include_str!("../../assets/shell.html");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_wires_up_the_shell_endpoint() {
        assert!(TERMINAL_PAGE.contains("/api/shell"));
        assert!(TERMINAL_PAGE.contains("__CLEAR__"));
        assert!(TERMINAL_PAGE.contains("xterm"));
    }

    #[test]
    fn test_page_swallows_unrecognized_escape_sequences() {
        // Arrow branches match their exact sequences; every other chunk
        // starting with ESC must be dropped before the printable filter
        assert!(TERMINAL_PAGE.contains(r#"data === "\x1b[A""#));
        assert!(TERMINAL_PAGE.contains(r#"data === "\x1b[B""#));
        assert!(TERMINAL_PAGE.contains("data.charCodeAt(0) === 27"));
    }
}
