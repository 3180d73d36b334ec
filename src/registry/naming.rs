//! Registry key derivation.
//!
//! # Responsibilities
//! - Derive a binding name from a type's simple name
//! - Extract simple names from fully-qualified identifiers
//!
//! # Design Decisions
//! - Lower-camel derivation touches only the first character
//! - Non-ASCII or already-lowercase leading characters pass through unchanged

/// Derive the registry binding name for a simple type name.
///
/// `UserService` becomes `userService`; only a leading uppercase ASCII
/// letter is folded, everything else is preserved as-is.
pub fn derive_key(simple_name: &str) -> String {
    let mut chars = simple_name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => {
            let mut key = String::with_capacity(simple_name.len());
            key.push(first.to_ascii_lowercase());
            key.push_str(chars.as_str());
            key
        }
        _ => simple_name.to_owned(),
    }
}

/// Strip the module path (and any `dyn ` prefix) off a qualified identifier.
pub fn simple_name(qualified: &str) -> &str {
    qualified.rsplit("::").next().unwrap_or(qualified)
}
