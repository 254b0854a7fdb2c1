//! Human-readable SQL reconstruction for logging.
//!
//! The output inlines parameter values as quoted literals. It is never
//! executed and makes no attempt to parse SQL.

use crate::value::Param;

/// Replace every parameter placeholder in `sql` with its quoted literal value.
///
/// Parameters are substituted longest name first so that `@id` cannot eat the
/// prefix of `@identifier`. Values are rendered with
/// [`SqlValue::invariant_text`](crate::value::SqlValue::invariant_text), single
/// quotes are doubled, and a value that would render as `''` becomes `NULL`.
pub fn query_to_debug_string(sql: &str, params: &[Param]) -> String {
    let mut ordered: Vec<&Param> = params.iter().filter(|p| !p.name.is_empty()).collect();
    // Stable sort: equal-length names keep caller order
    ordered.sort_by(|a, b| b.name.len().cmp(&a.name.len()));

    let mut out = sql.to_string();
    for param in ordered {
        out = out.replace(&param.name, &sql_literal(param));
    }
    out
}

fn sql_literal(param: &Param) -> String {
    let text = param.value.invariant_text();
    if text.is_empty() {
        return "NULL".to_string();
    }
    format!("'{}'", text.replace('\'', "''"))
}

#[cfg(test)]
#[path = "debug_sql_test.rs"]
mod tests;
