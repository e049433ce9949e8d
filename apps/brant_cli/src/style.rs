//! ANSI terminal color styling for error messages.

/// ANSI escape code styling utilities.
pub struct Style;

impl Style {
    pub const RESET: &'static str = "\x1b[0m";
    pub const BOLD: &'static str = "\x1b[1m";
    pub const RED: &'static str = "\x1b[31m";

    pub fn bold_red(s: &str) -> String {
        format!("{}{}{}{}", Self::BOLD, Self::RED, s, Self::RESET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_red_wraps_and_resets() {
        let result = Style::bold_red("error");
        assert!(result.contains("\x1b[1m"));
        assert!(result.contains("\x1b[31m"));
        assert!(result.contains("error"));
        assert!(result.ends_with("\x1b[0m"));
    }
}
