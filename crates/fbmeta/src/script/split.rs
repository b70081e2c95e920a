//! Splitting script text into individually executable statements.
//!
//! Scripts are isql-style: statements end with the current terminator
//! (`;` by default), string literals and comments may contain terminator
//! characters, and `SET TERM` switches the terminator so procedure bodies
//! can use `;` internally.

use thiserror::Error;

/// One executable statement extracted from a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// The statement text, without its terminator.
    pub text: String,
    /// Zero-based position of the statement within its script.
    pub ordinal: usize,
}

/// Error produced when a script cannot be split into statements.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedBlockComment,
}

/// Split script text into statements, preserving in-script order.
///
/// Terminators inside single-quoted strings (with `''` escapes),
/// double-quoted identifiers, `--` line comments, and `/* */` block
/// comments are ignored. `SET TERM <new> <old>` directives switch the
/// active terminator and are consumed, never returned as statements.
/// Comments preceding a statement are stripped; comments inside one are
/// kept. Empty statements are dropped.
pub fn split_statements(sql: &str) -> Result<Vec<Statement>, SplitError> {
    let chars: Vec<char> = sql.chars().collect();
    let mut statements: Vec<Statement> = Vec::new();
    let mut current = String::new();
    let mut term: Vec<char> = vec![';'];

    let mut in_single_quote = false;
    let mut in_double_quote = false;
    let mut in_line_comment = false;
    let mut in_block_comment = false;
    // Comments starting before any statement text are dropped entirely.
    let mut keep_comment = false;

    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        let next = chars.get(i + 1).copied();

        if in_line_comment {
            if keep_comment {
                current.push(ch);
            }
            if ch == '\n' {
                in_line_comment = false;
            }
            i += 1;
            continue;
        }

        if in_block_comment {
            if ch == '*' && next == Some('/') {
                if keep_comment {
                    current.push_str("*/");
                }
                in_block_comment = false;
                i += 2;
            } else {
                if keep_comment {
                    current.push(ch);
                }
                i += 1;
            }
            continue;
        }

        if !in_single_quote && !in_double_quote {
            if ch == '-' && next == Some('-') {
                keep_comment = !current.trim().is_empty();
                if keep_comment {
                    current.push_str("--");
                }
                in_line_comment = true;
                i += 2;
                continue;
            }
            if ch == '/' && next == Some('*') {
                keep_comment = !current.trim().is_empty();
                if keep_comment {
                    current.push_str("/*");
                }
                in_block_comment = true;
                i += 2;
                continue;
            }
            if matches_at(&chars, i, &term) {
                flush(&mut current, &mut statements, &mut term);
                i += term.len().max(1);
                continue;
            }
        }

        match ch {
            '\'' if !in_double_quote => {
                if in_single_quote && next == Some('\'') {
                    current.push_str("''");
                    i += 2;
                    continue;
                }
                in_single_quote = !in_single_quote;
                current.push(ch);
            }
            '"' if !in_single_quote => {
                if in_double_quote && next == Some('"') {
                    current.push_str("\"\"");
                    i += 2;
                    continue;
                }
                in_double_quote = !in_double_quote;
                current.push(ch);
            }
            _ => current.push(ch),
        }
        i += 1;
    }

    if in_single_quote || in_double_quote {
        return Err(SplitError::UnterminatedString);
    }
    if in_block_comment {
        return Err(SplitError::UnterminatedBlockComment);
    }

    flush(&mut current, &mut statements, &mut term);
    Ok(statements)
}

fn matches_at(chars: &[char], i: usize, term: &[char]) -> bool {
    !term.is_empty() && chars[i..].starts_with(term)
}

fn flush(current: &mut String, statements: &mut Vec<Statement>, term: &mut Vec<char>) {
    let text = current.trim().to_string();
    current.clear();

    if text.is_empty() {
        return;
    }

    if let Some(new_term) = set_term_directive(&text) {
        *term = new_term.chars().collect();
        return;
    }

    statements.push(Statement {
        text,
        ordinal: statements.len(),
    });
}

/// Returns the new terminator when `stmt` is a `SET TERM <new>` directive.
fn set_term_directive(stmt: &str) -> Option<String> {
    let mut tokens = stmt.split_whitespace();
    let set = tokens.next()?;
    let word_term = tokens.next()?;
    if !set.eq_ignore_ascii_case("SET") || !word_term.eq_ignore_ascii_case("TERM") {
        return None;
    }
    tokens.next().map(|t| t.to_string())
}
