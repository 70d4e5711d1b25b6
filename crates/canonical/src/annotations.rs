//! Removal of parenthetical annotations.
//!
//! Parliamentary transcripts interleave speech with stage directions such as
//! `(Applaudissements sur les bancs du groupe socialiste)`. Two reprints of the
//! same speech often differ only in which of these were transcribed, so they
//! are removed before shingling.

/// Removes every shortest `(`…`)` run that does not cross a line break.
///
/// An opening parenthesis with no closing one later on the same line is kept
/// verbatim. Nested parentheses are not balanced: `a (b (c) d)` becomes
/// `a  d)`, matching a lazy left-to-right scan.
///
/// ```rust
/// use canonical::strip_annotations;
///
/// assert_eq!(strip_annotations("Merci. (Rires) Merci."), "Merci.  Merci.");
/// assert_eq!(strip_annotations("open (\nnot closed)"), "open (\nnot closed)");
/// ```
pub fn strip_annotations(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('(') {
        let (before, from_open) = rest.split_at(open);
        out.push_str(before);

        match closing_on_same_line(&from_open[1..]) {
            Some(close) => {
                // Skip "(" + body + ")".
                rest = &from_open[1 + close + 1..];
            }
            None => {
                out.push('(');
                rest = &from_open[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Byte offset of the first `)` that precedes any newline.
fn closing_on_same_line(body: &str) -> Option<usize> {
    for (idx, ch) in body.char_indices() {
        match ch {
            ')' => return Some(idx),
            '\n' => return None,
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_single_annotation() {
        assert_eq!(
            strip_annotations("La séance est ouverte. (Applaudissements)"),
            "La séance est ouverte. "
        );
    }

    #[test]
    fn removes_multiple_annotations() {
        assert_eq!(strip_annotations("(Rires) a (Bruit) b"), " a  b");
    }

    #[test]
    fn lazy_match_does_not_balance_nesting() {
        assert_eq!(strip_annotations("a (b (c) d)"), "a  d)");
    }

    #[test]
    fn unclosed_parenthesis_kept() {
        assert_eq!(strip_annotations("a (b c"), "a (b c");
    }

    #[test]
    fn annotation_across_lines_kept() {
        assert_eq!(strip_annotations("a (b\nc) d"), "a (b\nc) d");
    }

    #[test]
    fn later_annotation_after_unclosed_line() {
        assert_eq!(strip_annotations("a (b\nc (d) e"), "a (b\nc  e");
    }

    #[test]
    fn empty_parentheses_removed() {
        assert_eq!(strip_annotations("x () y"), "x  y");
    }

    #[test]
    fn multibyte_content_preserved() {
        assert_eq!(strip_annotations("élu (réélu) député"), "élu  député");
    }
}
