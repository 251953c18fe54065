//! Casing-shape predicates over Unicode text.
//!
//! "Cased" characters are those with an uppercase or lowercase form.
//! Uncased characters (digits, punctuation, CJK) never decide a shape on
//! their own, so `"R2D2"` is uppercase and `"2nd"` is lowercase.

use serde::{Deserialize, Serialize};

/// At least one cased character, and every cased character is uppercase.
pub fn is_upper(s: &str) -> bool {
    let mut cased = false;
    for c in s.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}

/// At least one cased character, and every cased character is lowercase.
pub fn is_lower(s: &str) -> bool {
    let mut cased = false;
    for c in s.chars() {
        if c.is_uppercase() {
            return false;
        }
        if c.is_lowercase() {
            cased = true;
        }
    }
    cased
}

/// Title case: uppercase characters only follow uncased ones and lowercase
/// characters only follow cased ones. `"John"`, `"Jean-Luc"` and
/// `"New York"` qualify; `"JOHN"` and `"McDonald"` do not.
pub fn is_title(s: &str) -> bool {
    let mut cased = false;
    let mut prev_cased = false;
    for c in s.chars() {
        if c.is_uppercase() {
            if prev_cased {
                return false;
            }
            prev_cased = true;
            cased = true;
        } else if c.is_lowercase() {
            if !prev_cased {
                return false;
            }
            prev_cased = true;
            cased = true;
        } else {
            prev_cased = false;
        }
    }
    cased
}

/// Non-empty and made only of alphabetic characters.
pub fn is_alpha(s: &str) -> bool {
    !s.is_empty() && s.chars().all(char::is_alphabetic)
}

/// Non-empty and made only of alphanumeric characters.
pub fn is_alnum(s: &str) -> bool {
    !s.is_empty() && s.chars().all(char::is_alphanumeric)
}

/// Coarse casing classification of a surface string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CasingShape {
    Upper,
    Lower,
    Title,
    Mixed,
}

impl CasingShape {
    /// Classify `s`. Uppercase wins over title case for one-letter words.
    pub fn of(s: &str) -> Self {
        if is_upper(s) {
            CasingShape::Upper
        } else if is_lower(s) {
            CasingShape::Lower
        } else if is_title(s) {
            CasingShape::Title
        } else {
            CasingShape::Mixed
        }
    }

    /// Annotation shown next to person entities in reports.
    pub fn annotation(&self) -> Option<&'static str> {
        match self {
            CasingShape::Upper => Some("UPPERCASE"),
            CasingShape::Lower => Some("lowercase"),
            CasingShape::Title => Some("Title Case"),
            CasingShape::Mixed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shapes() {
        assert_eq!(CasingShape::of("JOHN"), CasingShape::Upper);
        assert_eq!(CasingShape::of("john"), CasingShape::Lower);
        assert_eq!(CasingShape::of("John"), CasingShape::Title);
        assert_eq!(CasingShape::of("McDonald"), CasingShape::Mixed);
        assert_eq!(CasingShape::of("1234"), CasingShape::Mixed);
    }

    #[test]
    fn test_uncased_characters_are_neutral() {
        assert!(is_upper("R2D2"));
        assert!(is_lower("2nd"));
        assert!(is_title("Jean-Luc"));
        assert!(is_title("New York"));
        assert!(!is_title("NEW York"));
    }

    #[test]
    fn test_non_ascii() {
        assert!(is_title("Ångström"));
        assert!(is_upper("ÉCOLE"));
        assert!(is_alpha("Dóttir"));
        assert!(!is_alpha("a.b"));
        assert!(is_alnum("abc123"));
        assert!(!is_alnum(""));
    }
}
