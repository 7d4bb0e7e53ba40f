use mongodb::bson::oid::ObjectId;

use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
    models::domain::UserRole,
};

/// Role gate for authoring endpoints. Runs before any ownership check.
pub fn require_teacher(claims: &Claims) -> AppResult<()> {
    if claims.role != UserRole::Teacher {
        return Err(AppError::Forbidden(
            "Not authorized as a teacher".to_string(),
        ));
    }
    Ok(())
}

pub fn require_owner(caller_id: &ObjectId, owner_id: &ObjectId, action: &str) -> AppResult<()> {
    if caller_id != owner_id {
        log::warn!("User {} denied: {} owned by {}", caller_id, action, owner_id);
        return Err(AppError::Forbidden(format!("Not authorized to {}", action)));
    }
    Ok(())
}
