//! Named parameter binding.
//!
//! DuckDB understands `?` and `$n` placeholders but not `@name`. Before a
//! statement is prepared, `@name` tokens that match a supplied parameter are
//! rewritten to `$k` markers (numbered by first appearance) and only the
//! referenced values are bound. Tokens inside quoted literals, quoted
//! identifiers and `--` / `/* */` comments are left alone.
//!
//! If no named token matches but the statement already uses `?` or `$n`, every
//! parameter value is bound in list order. Otherwise nothing is bound, so a
//! script statement that ignores the shared parameter list still runs.

use crate::value::{Param, SqlValue};
use std::fmt::Write;

/// SQL text ready to prepare, plus the values for its positional markers.
#[derive(Debug)]
pub(crate) struct BoundStatement<'p> {
    pub(crate) sql: String,
    pub(crate) values: Vec<&'p SqlValue>,
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Rewrite `@name` placeholders in `sql` against `params`.
pub(crate) fn bind_parameters<'p>(sql: &str, params: &'p [Param]) -> BoundStatement<'p> {
    let chars: Vec<char> = sql.chars().collect();
    let mut out = String::with_capacity(sql.len());
    let mut order: Vec<usize> = Vec::new();
    let mut positional = false;
    let mut quote: Option<char> = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if let Some(q) = quote {
            out.push(c);
            if c == q {
                quote = None;
            }
            i += 1;
            continue;
        }

        match c {
            '-' if chars.get(i + 1) == Some(&'-') => {
                let end = chars[i..]
                    .iter()
                    .position(|&n| n == '\n')
                    .map_or(chars.len(), |p| i + p);
                out.extend(&chars[i..end]);
                i = end;
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                let end = (i + 2..chars.len().saturating_sub(1))
                    .find(|&j| chars[j] == '*' && chars[j + 1] == '/')
                    .map_or(chars.len(), |j| j + 2);
                out.extend(&chars[i..end]);
                i = end;
            }
            '\'' | '"' => {
                quote = Some(c);
                out.push(c);
                i += 1;
            }
            '?' => {
                positional = true;
                out.push(c);
                i += 1;
            }
            '$' if chars.get(i + 1).is_some_and(|n| n.is_ascii_digit()) => {
                positional = true;
                out.push(c);
                i += 1;
            }
            '@' => {
                let mut end = i + 1;
                while end < chars.len() && is_ident_char(chars[end]) {
                    end += 1;
                }
                let token: String = chars[i..end].iter().collect();
                match params.iter().position(|p| p.name == token) {
                    Some(idx) if end > i + 1 => {
                        let slot = match order.iter().position(|&o| o == idx) {
                            Some(slot) => slot,
                            None => {
                                order.push(idx);
                                order.len() - 1
                            }
                        };
                        let _ = write!(out, "${}", slot + 1);
                    }
                    _ => out.push_str(&token),
                }
                i = end;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    let values = if !order.is_empty() {
        order.iter().map(|&idx| &params[idx].value).collect()
    } else if positional {
        params.iter().map(|p| &p.value).collect()
    } else {
        Vec::new()
    };

    BoundStatement { sql: out, values }
}

#[cfg(test)]
#[path = "bind_test.rs"]
mod tests;
