//! Single-slot `%s` template substitution.
//!
//! Subject, body, and attachment-path templates carry at most one `%s`
//! slot. Rendering a template without a slot is a no-op; the guard is
//! applied uniformly to all three templates.

/// Substitute the first `%s` slot in `template` with `value`.
///
/// Templates without a slot pass through unchanged, so a literal `%` in
/// a subject or body is safe.
pub fn render(template: &str, value: &str) -> String {
    match template.find("%s") {
        Some(pos) => {
            let mut out = String::with_capacity(template.len() + value.len());
            out.push_str(&template[..pos]);
            out.push_str(value);
            out.push_str(&template[pos + 2..]);
            out
        }
        None => template.to_string(),
    }
}
