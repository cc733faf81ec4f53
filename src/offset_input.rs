use once_cell::sync::Lazy;
use regex::Regex;

/// Accepts every in-progress spelling of a signed decimal, including `""`,
/// `"-"`, `"."` and `"1."`.
static OFFSET_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?[0-9]*\.?[0-9]*$").expect("valid offset pattern"));

pub fn is_acceptable(text: &str) -> bool {
    text.is_empty() || OFFSET_PATTERN.is_match(text)
}

/// Numeric text field that repairs itself on every edit.
///
/// `cursor` is a character index. When an edit breaks the pattern the
/// character just before the cursor is removed and the cursor steps back,
/// repeating until the text is acceptable again. An edit that cannot be
/// repaired that way is rolled back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffsetField {
    text: String,
    cursor: usize,
}

impl OffsetField {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the text wholesale, e.g. after the controller normalised it.
    pub fn set_text(&mut self, text: impl Into<String>) {
        *self = Self::new(text);
    }

    /// Apply an edit made by the user. Returns `true` if the text had to be
    /// repaired.
    pub fn on_text_changed(&mut self, text: &str, cursor: usize) -> bool {
        let mut chars: Vec<char> = text.chars().collect();
        let mut cursor = cursor.min(chars.len());
        let mut repaired = false;

        while !is_acceptable(&chars.iter().collect::<String>()) {
            if cursor == 0 {
                tracing::debug!(rejected = text, kept = %self.text, "offset edit rolled back");
                return true;
            }
            cursor -= 1;
            chars.remove(cursor);
            repaired = true;
        }

        self.text = chars.into_iter().collect();
        self.cursor = cursor;
        repaired
    }

    /// Append one character at the cursor, as a keystroke would.
    pub fn type_char(&mut self, c: char) -> bool {
        let mut chars: Vec<char> = self.text.chars().collect();
        let at = self.cursor.min(chars.len());
        chars.insert(at, c);
        let next: String = chars.into_iter().collect();
        self.on_text_changed(&next, at + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_progress_states_are_not_mutated() {
        for s in ["", "-", ".", "1.", "-.5", "12.50", "-0"] {
            let mut f = OffsetField::default();
            let cursor = s.chars().count();
            assert!(!f.on_text_changed(s, cursor), "{s:?} should be accepted");
            assert_eq!(f.text(), s);
            assert_eq!(f.cursor(), cursor);
        }
    }

    #[test]
    fn typing_letters_never_lands_in_field() {
        let mut f = OffsetField::default();
        let mut seen = Vec::new();
        for c in "12a3".chars() {
            f.type_char(c);
            seen.push(f.text().to_string());
        }
        assert_eq!(seen, ["1", "12", "12", "123"]);
        for s in &seen {
            assert!(s.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-'));
        }
        assert_eq!(f.cursor(), 3);
    }

    #[test]
    fn removes_offending_char_at_cursor() {
        let mut f = OffsetField::new("123");
        // user typed 'x' between 1 and 2
        assert!(f.on_text_changed("1x23", 2));
        assert_eq!(f.text(), "123");
        assert_eq!(f.cursor(), 1);
    }

    #[test]
    fn second_minus_or_dot_is_rejected() {
        let mut f = OffsetField::new("-1.5");
        assert!(f.type_char('.'));
        assert_eq!(f.text(), "-1.5");
        let mut g = OffsetField::new("-");
        assert!(g.type_char('-'));
        assert_eq!(g.text(), "-");
    }

    #[test]
    fn pasted_run_is_trimmed_back_to_valid_prefix() {
        let mut f = OffsetField::new("4");
        assert!(f.on_text_changed("4ab", 3));
        assert_eq!(f.text(), "4");
        assert_eq!(f.cursor(), 1);
    }

    #[test]
    fn unrepairable_edit_rolls_back() {
        let mut f = OffsetField::new("12");
        assert!(f.on_text_changed("x12", 0));
        assert_eq!(f.text(), "12");
        assert_eq!(f.cursor(), 2);
    }

    #[test]
    fn unicode_digits_are_rejected() {
        let mut f = OffsetField::default();
        f.type_char('٣');
        assert_eq!(f.text(), "");
    }
}
