//! Per-row highlight state machine.
//!
//! Re-entered on every call with the previous row's end state as input. The
//! pass walks the rendered bytes once, classifying each cell in priority
//! order: line comments (terminal for the rest of the row), block comment
//! enter/exit, strings with backslash escapes, numbers, then keywords. The
//! return value carries whether the row ends inside an unterminated block
//! comment; the owning document cascades to the next row only while that
//! bit changes.

use crate::{Syntax, SyntaxFlags};
use core_text::Highlight;

/// Characters that end an identifier-like token. Keyword matches require
/// one of these (or end of row) immediately after the keyword span; the
/// character *before* the span is deliberately not checked.
pub fn is_separator(c: u8) -> bool {
    c.is_ascii_whitespace() || c == b'\0' || b",.()+-/*=~%<>[];".contains(&c)
}

/// Classify every rendered cell of one row.
///
/// `starts_in_comment` is the previous row's end state (false for row 0).
/// Returns the highlight vector (same length as `render`) and whether the
/// row ends inside a block comment. With no profile every cell is `Normal`.
pub fn highlight_row(
    render: &str,
    syntax: Option<&Syntax>,
    starts_in_comment: bool,
) -> (Vec<Highlight>, bool) {
    let line = render.as_bytes();
    let mut hl = vec![Highlight::Normal; line.len()];
    let Some(syntax) = syntax else {
        return (hl, false);
    };

    let scs = syntax.line_comment.as_bytes();
    let mcs = syntax.block_comment_start.as_bytes();
    let mce = syntax.block_comment_end.as_bytes();

    let mut prev_sep = true;
    let mut in_string: Option<u8> = None;
    let mut in_comment = starts_in_comment;

    let mut i = 0;
    while i < line.len() {
        let c = line[i];
        let prev_hl = if i > 0 { hl[i - 1] } else { Highlight::Normal };

        // Line comments short-circuit: everything to end of row.
        if !scs.is_empty() && in_string.is_none() && !in_comment && line[i..].starts_with(scs) {
            hl[i..].fill(Highlight::Comment);
            break;
        }

        if !mcs.is_empty() && !mce.is_empty() && in_string.is_none() {
            if in_comment {
                hl[i] = Highlight::BlockComment;
                if line[i..].starts_with(mce) {
                    hl[i..i + mce.len()].fill(Highlight::BlockComment);
                    i += mce.len();
                    in_comment = false;
                    prev_sep = true;
                    continue;
                }
                i += 1;
                continue;
            } else if line[i..].starts_with(mcs) {
                hl[i..i + mcs.len()].fill(Highlight::BlockComment);
                i += mcs.len();
                in_comment = true;
                continue;
            }
        }

        if syntax.flags.contains(SyntaxFlags::STRINGS) {
            if let Some(quote) = in_string {
                hl[i] = Highlight::String;
                // Backslash escapes consume the next cell too.
                if c == b'\\' && i + 1 < line.len() {
                    hl[i + 1] = Highlight::String;
                    i += 2;
                    continue;
                }
                if c == quote {
                    in_string = None;
                }
                prev_sep = true;
                i += 1;
                continue;
            } else if c == b'"' || c == b'\'' {
                in_string = Some(c);
                hl[i] = Highlight::String;
                i += 1;
                continue;
            }
        }

        if syntax.flags.contains(SyntaxFlags::NUMBERS)
            && ((c.is_ascii_digit() && (prev_sep || prev_hl == Highlight::Number))
                || (c == b'.' && prev_hl == Highlight::Number))
        {
            hl[i] = Highlight::Number;
            prev_sep = false;
            i += 1;
            continue;
        }

        if prev_sep {
            if let Some(consumed) = match_keyword(line, i, syntax, &mut hl) {
                i += consumed;
                prev_sep = false;
                continue;
            }
        }

        prev_sep = is_separator(c);
        i += 1;
    }

    (hl, in_comment)
}

/// Try each configured keyword at `line[i..]`; a match needs a separator
/// (or end of row) right after the span. Paints and returns the consumed
/// length on success.
fn match_keyword(line: &[u8], i: usize, syntax: &Syntax, hl: &mut [Highlight]) -> Option<usize> {
    for entry in syntax.keywords {
        let (kw, class) = match entry.strip_suffix('|') {
            Some(kw) => (kw.as_bytes(), Highlight::Keyword2),
            None => (entry.as_bytes(), Highlight::Keyword1),
        };
        let end = i + kw.len();
        if line[i..].starts_with(kw) && (end == line.len() || is_separator(line[end])) {
            hl[i..end].fill(class);
            return Some(kw.len());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select;
    use core_text::Highlight as H;

    fn c_profile() -> &'static Syntax {
        select("t.c").unwrap()
    }

    #[test]
    fn no_profile_is_pass_through() {
        let (hl, open) = highlight_row("int x = 5; // hi", None, false);
        assert!(hl.iter().all(|&h| h == H::Normal));
        assert!(!open);
    }

    #[test]
    fn declaration_classifies_keyword_and_number() {
        let (hl, open) = highlight_row("int x = 5;", Some(c_profile()), false);
        // "int" is a type keyword
        assert_eq!(&hl[0..3], &[H::Keyword2; 3]);
        // "x" and "=" are plain
        assert_eq!(hl[4], H::Normal);
        assert_eq!(hl[6], H::Normal);
        // "5" is a number, ";" is plain
        assert_eq!(hl[8], H::Number);
        assert_eq!(hl[9], H::Normal);
        assert!(!open);
    }

    #[test]
    fn full_line_comment() {
        let (hl, _) = highlight_row("// done", Some(c_profile()), false);
        assert!(hl.iter().all(|&h| h == H::Comment));
    }

    #[test]
    fn primary_keyword_class() {
        let (hl, _) = highlight_row("return x;", Some(c_profile()), false);
        assert_eq!(&hl[0..6], &[H::Keyword1; 6]);
    }

    #[test]
    fn keyword_as_identifier_prefix_not_matched() {
        // "intx" must not highlight "int": no separator after the span.
        let (hl, _) = highlight_row("intx = 1;", Some(c_profile()), false);
        assert_eq!(&hl[0..4], &[H::Normal; 4]);
    }

    #[test]
    fn keyword_at_end_of_row_matches() {
        let (hl, _) = highlight_row("return", Some(c_profile()), false);
        assert_eq!(&hl[0..6], &[H::Keyword1; 6]);
    }

    #[test]
    fn keyword_prefix_quirk_preserved() {
        // The separator check only looks *after* the span. A closing quote
        // leaves separator context set even though '"' is not a separator,
        // so a keyword butted against it still highlights.
        let (hl, _) = highlight_row("\"s\"if(x)", Some(c_profile()), false);
        assert_eq!(&hl[3..5], &[H::Keyword1; 2]);
    }

    #[test]
    fn string_with_escape() {
        let (hl, _) = highlight_row(r#"x = "a\"b";"#, Some(c_profile()), false);
        // cells 4..10 are the quoted literal including the escaped quote
        assert!(hl[4..10].iter().all(|&h| h == H::String));
        assert_eq!(hl[10], H::Normal);
    }

    #[test]
    fn single_quote_string() {
        let (hl, _) = highlight_row("c = 'q';", Some(c_profile()), false);
        assert!(hl[4..7].iter().all(|&h| h == H::String));
    }

    #[test]
    fn number_with_decimal_point() {
        let (hl, _) = highlight_row("x = 3.14;", Some(c_profile()), false);
        assert!(hl[4..8].iter().all(|&h| h == H::Number));
    }

    #[test]
    fn digit_inside_identifier_is_normal() {
        let (hl, _) = highlight_row("x2 = 1;", Some(c_profile()), false);
        assert_eq!(hl[1], H::Normal);
    }

    #[test]
    fn block_comment_opens_and_reports_state() {
        let (hl, open) = highlight_row("a /* b", Some(c_profile()), false);
        assert_eq!(hl[0], H::Normal);
        assert!(hl[2..].iter().all(|&h| h == H::BlockComment));
        assert!(open);
    }

    #[test]
    fn block_comment_closes_mid_row() {
        let (hl, open) = highlight_row("*/c", Some(c_profile()), true);
        assert_eq!(&hl[0..2], &[H::BlockComment; 2]);
        assert_eq!(hl[2], H::Normal);
        assert!(!open);
    }

    #[test]
    fn line_comment_prefix_ignored_inside_block_comment() {
        let (hl, open) = highlight_row("// still block", Some(c_profile()), true);
        assert!(hl.iter().all(|&h| h == H::BlockComment));
        assert!(open);
    }

    #[test]
    fn block_delimiters_inside_string_are_literal() {
        let (hl, open) = highlight_row(r#"s = "/*";"#, Some(c_profile()), false);
        assert!(hl[4..8].iter().all(|&h| h == H::String));
        assert!(!open);
    }
}
