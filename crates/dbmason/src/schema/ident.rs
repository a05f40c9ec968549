//! Identifier quoting and validation.
//!
//! Both supported dialects accept backtick-quoted identifiers, so one quoting
//! scheme serves the whole crate. Quoting never rewrites a name beyond the
//! escaping the quote character itself requires.

use crate::error::{DbError, Result};

/// Maximum identifier length accepted before quoting.
const MAX_IDENT_LEN: usize = 128;

/// Validate an identifier for use in generated DDL.
///
/// Rejects empty names, embedded NUL bytes and names longer than the engines
/// accept. Anything else is allowed; quoting handles the rest.
pub fn validate(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(DbError::Precondition(
            "identifier cannot be empty".to_string(),
        ));
    }
    if name.contains('\0') {
        return Err(DbError::Precondition(format!(
            "identifier '{}' contains a NUL byte",
            name.escape_debug()
        )));
    }
    if name.len() > MAX_IDENT_LEN {
        let prefix: String = name.chars().take(32).collect();
        return Err(DbError::Precondition(format!(
            "identifier '{prefix}...' exceeds {MAX_IDENT_LEN} bytes"
        )));
    }
    Ok(())
}

/// Quote an identifier with backticks, doubling embedded backticks.
pub fn quote(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Validate and quote in one step.
pub fn quoted(name: &str) -> Result<String> {
    validate(name)?;
    Ok(quote(name))
}

/// Quote a list of column names and join them with `, `.
pub fn quote_list(names: &[String]) -> Result<String> {
    let mut quoted_names = Vec::with_capacity(names.len());
    for name in names {
        quoted_names.push(quoted(name)?);
    }
    Ok(quoted_names.join(", "))
}
