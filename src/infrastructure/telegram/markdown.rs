//! MarkdownV2 rendering for outgoing text
//!
//! Narration marks character actions as `*action*`; those spans are shown as
//! inline code keeping the asterisks, everything else is escaped literally.

/// Characters MarkdownV2 reserves outside of code spans
const RESERVED: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!', '\\',
];

/// Escape text so Telegram renders it verbatim
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if RESERVED.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escape the contents of an inline code span
fn escape_code(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '`' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escape text and turn single-line `*action*` spans into inline code
pub fn stylize_actions(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut rest = text;

    while let Some(start) = rest.find('*') {
        out.push_str(&escape(&rest[..start]));
        let after = &rest[start + 1..];

        let line_end = after.find('\n').unwrap_or(after.len());
        match after[..line_end].find('*') {
            Some(close) if close > 0 => {
                out.push_str("`*");
                out.push_str(&escape_code(&after[..close]));
                out.push_str("*`");
                rest = &after[close + 1..];
            }
            _ => {
                out.push_str("\\*");
                rest = after;
            }
        }
    }

    out.push_str(&escape(rest));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_reserved() {
        assert_eq!(escape("DC 12. Ура!"), "DC 12\\. Ура\\!");
        assert_eq!(escape("a_b (c)"), "a\\_b \\(c\\)");
    }

    #[test]
    fn test_action_span_becomes_code() {
        assert_eq!(
            stylize_actions("Гном *пинает дверь* и смеётся."),
            "Гном `*пинает дверь*` и смеётся\\."
        );
    }

    #[test]
    fn test_unpaired_asterisk_escaped() {
        assert_eq!(stylize_actions("5 * 4"), "5 \\* 4");
        assert_eq!(stylize_actions("**"), "\\*\\*");
    }

    #[test]
    fn test_span_does_not_cross_lines() {
        assert_eq!(stylize_actions("*a\nb*"), "\\*a\nb\\*");
    }

    #[test]
    fn test_backtick_inside_action_escaped() {
        assert_eq!(stylize_actions("*жмёт `кнопку`*"), "`*жмёт \\`кнопку\\`*`");
    }
}
