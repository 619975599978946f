use std::num::{IntErrorKind, ParseIntError};

/// Explain a number parsing error in a way that fits after 'The number ...'
pub(crate) const fn explain_number_error(error: &ParseIntError) -> &'static str {
    match error.kind() {
        IntErrorKind::Empty => "is empty",
        IntErrorKind::InvalidDigit => "contains an invalid character",
        IntErrorKind::NegOverflow => "is too small to fit in the internal representation",
        IntErrorKind::PosOverflow => "is too big to fit in the internal representation",
        IntErrorKind::Zero => "is zero, which is not allowed here",
        _ => "is not a valid number",
    }
}

/// Find the first occurrence of the given character that is not enclosed in any
/// `[]`, `{}`, or `<>` pair. Returns the character index (not the byte offset).
pub(crate) fn first_unenclosed(text: &str, target: char) -> Option<usize> {
    let mut brackets = 0_usize;
    let mut braces = 0_usize;
    let mut global = false;
    for (index, ch) in text.chars().enumerate() {
        match ch {
            '[' => brackets += 1,
            ']' => brackets = brackets.saturating_sub(1),
            '{' => braces += 1,
            '}' => braces = braces.saturating_sub(1),
            '<' if brackets == 0 && braces == 0 => global = true,
            '>' if brackets == 0 && braces == 0 => global = false,
            c if c == target && brackets == 0 && braces == 0 && !global => return Some(index),
            _ => (),
        }
    }
    None
}

/// Check that every `]` closes an earlier `[` and that no `[` is left open
pub(crate) fn brackets_balanced(text: &str) -> bool {
    let mut depth = 0_usize;
    for ch in text.chars() {
        match ch {
            '[' => depth += 1,
            ']' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => (),
        }
    }
    depth == 0
}

#[test]
#[allow(clippy::missing_panics_doc)]
fn test_brackets_balanced() {
    assert!(brackets_balanced("Hex"));
    assert!(brackets_balanced("Xlink:BuUrBu[85]"));
    assert!(!brackets_balanced("g2 ["));
    assert!(!brackets_balanced("X]"));
    assert!(!brackets_balanced("]["));
}

#[test]
#[allow(clippy::missing_panics_doc)]
fn test_first_unenclosed() {
    assert_eq!(first_unenclosed("[Phospho]?EMK", '?'), Some(9));
    assert_eq!(first_unenclosed("[Info:what?]?EMK", '?'), Some(12));
    assert_eq!(first_unenclosed("<[Info:?]@C>EMK", '?'), None);
    assert_eq!(first_unenclosed("EMK", '?'), None);
}

#[test]
#[allow(clippy::missing_panics_doc)]
fn test_explain_number_error() {
    assert_eq!(
        explain_number_error(&"".parse::<u32>().unwrap_err()),
        "is empty"
    );
    assert_eq!(
        explain_number_error(&"99999999999".parse::<u32>().unwrap_err()),
        "is too big to fit in the internal representation"
    );
}
