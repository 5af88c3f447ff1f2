//! Canonical forms for shared reference data
//!
//! Tags and fiction types are deduplicated by their canonical name: the
//! trimmed, lower-cased form with internal whitespace collapsed. Two labels
//! that canonicalize to the same string refer to the same row.

/// Canonical form of a user-supplied tag label.
///
/// Trims surrounding whitespace, collapses runs of internal whitespace to a
/// single `-`, and lower-cases the result. `"  Sci Fy "` and `"sci-fy"` both
/// canonicalize to `"sci-fy"`.
pub fn canonical_tag(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// Canonical name of a user-supplied fiction type.
///
/// Trims, collapses internal whitespace to a single space, and lower-cases.
/// The slug form is derived separately with [`slugify`].
pub fn canonical_fiction_type(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// URL-safe slug for a canonical fiction type name.
pub fn slugify(canonical_name: &str) -> String {
    canonical_name.replace(' ', "-")
}
