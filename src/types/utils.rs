//! Small shared helpers.

use std::fmt::Display;

/// Keep the `Ok` value; log the error at warn level and discard it.
///
/// # Example
/// ```ignore
/// let structurer = log_filter_warn(create_structurer(lang), "Creating structurer")?;
/// ```
pub fn log_filter_warn<T, E: Display>(result: Result<T, E>, context: &str) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!("{}: {}", context, e);
            None
        }
    }
}

/// Reduce a textual type reference to its bare name.
///
/// `List<String>` → `List`, `Base[T]` → `Base`, `&'a mut Foo` → `Foo`, `*Server` → `Server`.
/// Dotted/qualified paths are kept (`java.util.List<E>` → `java.util.List`).
pub fn strip_generics(type_ref: &str) -> String {
    let trimmed = type_ref.trim();
    let end = trimmed.find(['<', '[', '(']).unwrap_or(trimmed.len());
    let head = trimmed[..end].trim();

    let head = head
        .trim_start_matches(['&', '*'])
        .trim_start_matches("mut ")
        .trim_start_matches("dyn ")
        .trim();
    let head = match head.strip_prefix('\'') {
        // lifetime: `'a Foo`
        Some(rest) => rest.split_once(' ').map(|(_, t)| t).unwrap_or(rest),
        None => head,
    };
    head.trim_start_matches("mut ")
        .replace("::", ".")
        .trim()
        .to_string()
}

/// Text after the last `.` (the whole string when undotted).
pub fn last_segment(dotted: &str) -> &str {
    dotted.rsplit('.').next().unwrap_or(dotted)
}
