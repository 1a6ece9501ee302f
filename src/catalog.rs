// src/catalog.rs
use crate::models::OTHER_SERVICE;

/// Well-known services offered by the adapter, as (slug, display name).
pub const SERVICES: &[(&str, &str)] = &[
    ("google", "Google"),
    ("microsoft", "Microsoft"),
    ("apple", "Apple"),
    ("amazon", "Amazon"),
    ("facebook", "Facebook"),
    ("twitter", "Twitter"),
    ("instagram", "Instagram"),
    ("linkedin", "LinkedIn"),
    ("github", "GitHub"),
    ("netflix", "Netflix"),
];

pub fn service_label(slug: &str) -> Option<&'static str> {
    SERVICES
        .iter()
        .find(|(known, _)| *known == slug)
        .map(|(_, label)| *label)
}

/// Resolves the display name for a service slug.
///
/// Catalog slugs map to their label; `other` and unknown slugs use the custom
/// name the caller typed, which may be empty (the store rejects that).
pub fn resolve_service_name(slug: &str, custom_name: Option<&str>) -> String {
    match service_label(slug) {
        Some(label) if slug != OTHER_SERVICE => label.to_string(),
        _ => custom_name.unwrap_or_default().trim().to_string(),
    }
}
