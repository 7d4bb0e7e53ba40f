use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{
    domain::{User, UserRole},
    dto::quiz_dto::QuestionWithAnswer,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            id: user.id.to_hex(),
            username: user.username,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub score: i32,
    /// Questions answered correctly, independent of their point weight.
    pub correct_count: usize,
    pub total_questions: usize,
    pub time_spent: i64,
}

/// Flattened result row for the results dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub quiz_id: String,
    /// `None` once the quiz has been deleted.
    pub quiz_title: Option<String>,
    pub quiz_subject: Option<String>,
    pub student_name: String,
    pub student_id: Option<String>,
    pub score: i32,
    pub answers: Vec<i32>,
    pub time_spent: i64,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultDetail {
    #[serde(flatten)]
    pub summary: ResultSummary,
    pub questions: Vec<QuestionWithAnswer>,
}
