//! Slug selection for rows with a unique `slug` column.

use common::types::Availability;
use common::utils::slug::{slugify, unique_slug};
use uuid::Uuid;

use crate::errors::ServiceError;

/// Slug for a new or renamed row.
///
/// An explicit slug is normalized and must be free. Otherwise one is derived
/// from `source` and suffixed until free. `taken` must not contain the row's
/// own current slug.
pub fn pick_slug(explicit: Option<&str>, source: &str, taken: &[String]) -> Result<String, ServiceError> {
    match explicit.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => {
            let slug = slugify(raw)?;
            if taken.iter().any(|t| t == &slug) {
                return Err(ServiceError::Conflict(format!("slug '{slug}' is already taken")));
            }
            Ok(slug)
        }
        None => {
            let base = slugify(source)?;
            Ok(unique_slug(&base, |candidate| taken.iter().any(|t| t == candidate)))
        }
    }
}

/// Answer for the live "is this slug free" check.
pub fn availability(slug: String, owner: Option<Uuid>, exclude_id: Option<Uuid>) -> Availability {
    let available = match owner {
        None => true,
        Some(id) => Some(id) == exclude_id,
    };
    Availability { available, slug: Some(slug) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_and_suffixes() {
        let taken = vec!["summer-show".to_string()];
        assert_eq!(pick_slug(None, "Summer Show", &taken).unwrap(), "summer-show-2");
        assert_eq!(pick_slug(Some("  "), "Winter", &taken).unwrap(), "winter");
    }

    #[test]
    fn explicit_slug_is_normalized_and_must_be_free() {
        assert_eq!(pick_slug(Some("My Slug"), "ignored", &[]).unwrap(), "my-slug");
        let taken = vec!["my-slug".to_string()];
        assert!(matches!(pick_slug(Some("my-slug"), "x", &taken), Err(ServiceError::Conflict(_))));
        assert!(matches!(pick_slug(Some("!!"), "x", &[]), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn own_slug_counts_as_available() {
        let id = Uuid::new_v4();
        assert!(availability("a".into(), Some(id), Some(id)).available);
        assert!(!availability("a".into(), Some(id), None).available);
        assert!(availability("a".into(), None, None).available);
    }
}
