//! Unicode normalization and classifier-oriented case preprocessing.

use unicode_normalization::UnicodeNormalization;

use anonyx_common::casing::{is_alpha, is_lower, is_upper};

/// NFKC-normalize `text` without case folding. Idempotent.
pub fn normalize(text: &str) -> String {
    text.nfkc().collect()
}

/// Recase tokens so the classifier sees capitalized candidates.
///
/// Per whitespace-delimited token:
/// - all-uppercase alphabetic, longer than 2 chars → title case (`MICROSOFT` → `Microsoft`)
/// - all-lowercase alphabetic, longer than 2 chars → capitalized (`john` → `John`)
/// - anything else is left alone
///
/// Whitespace is copied through untouched and only one-to-one character case
/// mappings are applied, so the output has exactly the same character
/// offsets as the input.
pub fn preprocess(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut token_start: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(start) = token_start.take() {
                out.push_str(&recase_token(&text[start..idx]));
            }
            out.push(ch);
        } else if token_start.is_none() {
            token_start = Some(idx);
        }
    }
    if let Some(start) = token_start {
        out.push_str(&recase_token(&text[start..]));
    }
    out
}

fn recase_token(token: &str) -> String {
    if token.chars().count() <= 2 || !is_alpha(token) {
        return token.to_string();
    }
    if is_upper(token) || is_lower(token) {
        capitalize(token)
    } else {
        token.to_string()
    }
}

/// First character uppercased, the rest lowercased, one char per char.
fn capitalize(token: &str) -> String {
    token
        .chars()
        .enumerate()
        .map(|(i, c)| {
            if i == 0 {
                single_char(c.to_uppercase()).unwrap_or(c)
            } else {
                single_char(c.to_lowercase()).unwrap_or(c)
            }
        })
        .collect()
}

fn single_char(mut mapped: impl Iterator<Item = char>) -> Option<char> {
    let first = mapped.next()?;
    match mapped.next() {
        None => Some(first),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_compatibility_forms() {
        // fullwidth letters, ligature, and a decomposed accent
        assert_eq!(normalize("ＡＢＣ ﬁle Cafe\u{301}"), "ABC file Café");
    }

    #[test]
    fn test_normalize_preserves_case() {
        assert_eq!(normalize("JOHN smith"), "JOHN smith");
    }

    #[test]
    fn test_preprocess_recases_tokens() {
        assert_eq!(
            preprocess("JOHN SMITH works at MICROSOFT"),
            "John Smith Works at Microsoft"
        );
    }

    #[test]
    fn test_preprocess_leaves_other_shapes() {
        // short, mixed-case, and non-alphabetic tokens pass through
        assert_eq!(
            preprocess("IBM's CEO McDonald in NY, jo smith2 e-mail"),
            "IBM's Ceo McDonald in NY, jo smith2 e-mail"
        );
    }

    #[test]
    fn test_preprocess_keeps_whitespace_layout() {
        let text = "  alice\t\tBOB\n\ncarol  ";
        let out = preprocess(text);
        assert_eq!(out, "  Alice\t\tBob\n\nCarol  ");
        assert_eq!(out.chars().count(), text.chars().count());
    }

    #[test]
    fn test_preprocess_skips_multi_char_case_mappings() {
        // 'ŉ' uppercases to two characters, so it is kept as is
        let out = preprocess("ŉabc straße");
        assert_eq!(out, "ŉabc Straße");
        assert_eq!(out.chars().count(), 11);
    }
}
