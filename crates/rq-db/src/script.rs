//! SQL script splitting.
//!
//! [`LineSemicolonSplitter`] is a line-oriented heuristic: lines are joined
//! with spaces until a line whose trimmed end is `;`. It does not understand
//! quoted strings, comments or batch separators, so a `;` at the end of a line
//! inside a multi-line string literal ends the statement early.

/// Splits a script into executable statements.
pub trait StatementSplitter: Send + Sync {
    fn split(&self, script: &str) -> Vec<String>;
}

/// Default splitter: a statement ends on a line whose trimmed text ends in `;`.
///
/// Text after the last terminated statement is not returned; a warning is
/// logged when that tail holds anything but whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineSemicolonSplitter;

impl StatementSplitter for LineSemicolonSplitter {
    fn split(&self, script: &str) -> Vec<String> {
        let mut statements = Vec::new();
        let mut buffer = String::new();

        for line in script.lines() {
            buffer.push_str(line);
            buffer.push(' ');
            if line.trim_end().ends_with(';') {
                statements.push(std::mem::take(&mut buffer));
            }
        }

        let tail = buffer.trim();
        if !tail.is_empty() {
            log::warn!("Discarding unterminated statement at end of script: {}", tail);
        }

        statements
    }
}

#[cfg(test)]
#[path = "script_test.rs"]
mod tests;
