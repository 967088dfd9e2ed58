//! Utility functions shared by the registry and reference stores.

/// Normalize an exercise key or display name into its canonical key form.
///
/// Trims surrounding whitespace, lowercases, and replaces spaces with
/// underscores, so `"Bicep Curl"` and `"bicep_curl"` resolve to the same key.
/// Registry lookups and reference store keys must both go through this.
pub fn normalize_exercise_key(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "_")
}
