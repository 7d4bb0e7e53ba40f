use std::collections::HashSet;

use mongodb::bson::oid::ObjectId;

use crate::errors::{AppError, AppResult};

/// Parses a path id. A malformed id cannot name a stored document, so it is
/// reported the same way as a missing one.
pub fn parse_object_id(id: &str, resource: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(id.trim())
        .map_err(|_| AppError::NotFound(format!("{} not found", resource)))
}

/// Unique ids in first-seen order.
pub fn unique_ids(ids: impl IntoIterator<Item = ObjectId>) -> Vec<ObjectId> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_id() {
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex(), "Quiz").unwrap(), id);
    }

    #[test]
    fn test_malformed_id_is_not_found() {
        let err = parse_object_id("123", "Quiz").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.to_string(), "Quiz not found");
    }

    #[test]
    fn test_unique_ids_keeps_first_occurrence_order() {
        let a = ObjectId::new();
        let b = ObjectId::new();
        assert_eq!(unique_ids(vec![b, a, b, a]), vec![b, a]);
    }
}
