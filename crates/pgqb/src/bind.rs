//! Placeholder rebinding for the execution layer.
//!
//! Builders emit driver-neutral `?` placeholders in bind format. A
//! PostgreSQL driver wants `$1, $2, ...`, so the execution layer runs the
//! statement through [`rebind`] once before preparing it.

use std::iter::Peekable;
use std::str::Chars;

/// Rewrite `?` placeholders as `$1, $2, ...` in left-to-right order.
///
/// Quoted regions are copied untouched so a question mark inside a
/// `'...'` string literal or a `"..."` identifier is never renumbered.
/// Doubled quotes inside a quoted region are the usual escapes.
///
/// # Example
///
/// ```ignore
/// let sql = rebind("SELECT * FROM \"user\" WHERE \"xid\" = ? AND \"age\" >= ?");
/// assert_eq!(sql, "SELECT * FROM \"user\" WHERE \"xid\" = $1 AND \"age\" >= $2");
/// ```
pub fn rebind(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut chars = sql.chars().peekable();
    let mut index = 0usize;

    while let Some(ch) = chars.next() {
        match ch {
            '?' => {
                index += 1;
                out.push('$');
                out.push_str(&index.to_string());
            }
            '\'' | '"' => {
                out.push(ch);
                copy_quoted(&mut out, &mut chars, ch);
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Copy up to and including the closing quote, treating a doubled quote
/// as an escape that stays inside the region.
fn copy_quoted(out: &mut String, chars: &mut Peekable<Chars<'_>>, quote: char) {
    while let Some(ch) = chars.next() {
        out.push(ch);
        if ch == quote {
            if chars.peek() == Some(&quote) {
                out.push(quote);
                chars.next();
            } else {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_placeholders_in_order() {
        assert_eq!(
            rebind("\"a\" = ? AND \"b\" IN (?, ?, ?)"),
            "\"a\" = $1 AND \"b\" IN ($2, $3, $4)"
        );
    }

    #[test]
    fn question_marks_in_string_literals_survive() {
        assert_eq!(
            rebind("\"note\" = 'what?' AND \"x\" = ?"),
            "\"note\" = 'what?' AND \"x\" = $1"
        );
    }

    #[test]
    fn doubled_quote_escapes_stay_inside_the_literal() {
        assert_eq!(
            rebind("\"note\" = 'it''s ?' AND \"x\" = ?"),
            "\"note\" = 'it''s ?' AND \"x\" = $1"
        );
    }

    #[test]
    fn quoted_identifiers_are_untouched() {
        assert_eq!(rebind("\"odd?name\" = ?"), "\"odd?name\" = $1");
    }

    #[test]
    fn no_placeholders_is_a_copy() {
        assert_eq!(rebind("SELECT 1"), "SELECT 1");
        assert_eq!(rebind(""), "");
    }

    #[test]
    fn unterminated_quote_copies_the_rest() {
        assert_eq!(rebind("'oops ?"), "'oops ?");
    }
}
