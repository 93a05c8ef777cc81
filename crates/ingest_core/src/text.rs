//! Text canonicalization shared by every extractor.

/// Canonicalize scraped text: trim, collapse runs of horizontal whitespace
/// (space, tab, vertical tab) into a single space, and collapse runs of
/// line-break characters (CR, LF, form feed) into a single newline.
///
/// Multi-byte characters pass through untouched, and the function is
/// idempotent: `simplify(simplify(s)) == simplify(s)`.
pub fn simplify(text: &str) -> String {
    let trimmed = text.trim();
    let mut out = String::with_capacity(trimmed.len());
    let mut chars = trimmed.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            ' ' | '\t' | '\u{000B}' => {
                while matches!(chars.peek(), Some(&(' ' | '\t' | '\u{000B}'))) {
                    chars.next();
                }
                out.push(' ');
            }
            '\r' | '\n' | '\u{000C}' => {
                while matches!(chars.peek(), Some(&('\r' | '\n' | '\u{000C}'))) {
                    chars.next();
                }
                out.push('\n');
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Drop absent entries from a sequence.
///
/// With `collapse`, an all-absent input coerces to `None` because downstream
/// consumers treat "no items" and "field not applicable" identically. Callers
/// in list contexts pass `collapse = false` to always get a real sequence.
pub fn reduce<T>(items: Vec<Option<T>>, collapse: bool) -> Option<Vec<T>> {
    let kept: Vec<T> = items.into_iter().flatten().collect();
    if collapse && kept.is_empty() {
        None
    } else {
        Some(kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_collapses_horizontal_whitespace() {
        assert_eq!(simplify("  Council \t Briefing  "), "Council Briefing");
        assert_eq!(simplify("a \u{000B} b"), "a b");
    }

    #[test]
    fn unifies_line_breaks() {
        assert_eq!(simplify("agenda\r\nitem"), "agenda\nitem");
        assert_eq!(simplify("agenda\r\r\n\u{000C}item"), "agenda\nitem");
    }

    #[test]
    fn idempotent() {
        let samples = [
            "  Public   Comment \r\n Period ",
            "already simple",
            "",
            " mixed \t ws \n\n and breaks \r ",
        ];
        for s in samples {
            assert_eq!(simplify(&simplify(s)), simplify(s));
        }
    }

    #[test]
    fn equal_after_trim_simplify_equal() {
        assert_eq!(simplify("  Budget Hearing"), simplify("Budget Hearing  "));
    }

    #[test]
    fn preserves_multibyte_characters() {
        assert_eq!(simplify("  Café  Renée "), "Café Renée");
        assert_eq!(simplify("議会\t会議"), "議会 会議");
    }

    #[test]
    fn reduce_drops_absent_entries() {
        assert_eq!(reduce(vec![Some(1), None, Some(2)], true), Some(vec![1, 2]));
    }

    #[test]
    fn reduce_collapses_empty_to_none() {
        assert_eq!(reduce::<i32>(vec![None, None], true), None);
    }

    #[test]
    fn reduce_without_collapse_keeps_empty_sequence() {
        assert_eq!(reduce::<i32>(vec![None, None], false), Some(vec![]));
    }
}
