//! Filename validation and sanitization.

use crate::error::{Error, Result};

/// Sanitize a path component (folder or file name) with less strict validation.
///
/// Used for display names coming from the platform, where separators are
/// replaced rather than rejected.
pub fn sanitize_path_component(name: &str) -> Result<String> {
    // Reject null bytes
    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed: '{}'",
            name
        )));
    }

    let sanitized = replace_reserved(name);

    let sanitized = sanitized.trim();

    // Reject empty or whitespace-only names
    if sanitized.is_empty() {
        return Err(Error::InvalidFilename(
            "Path component cannot be empty or whitespace-only".to_string(),
        ));
    }

    // Separators are gone, so only the dot entries themselves can traverse
    if sanitized == "." || sanitized == ".." {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    Ok(sanitized.to_string())
}

/// Sanitize a platform-provided filename, falling back to `fallback` when the
/// name cannot be made safe.
pub fn filename_or(name: &str, fallback: &str) -> String {
    match sanitize_path_component(name) {
        Ok(clean) => clean,
        Err(e) => {
            tracing::debug!("Using fallback name {}: {}", fallback, e);
            fallback.to_string()
        }
    }
}

fn replace_reserved(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
