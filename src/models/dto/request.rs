use once_cell::sync::Lazy;
use serde::Deserialize;
use validator::Validate;

use crate::models::domain::UserRole;

static USERNAME_REGEX: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"^[a-zA-Z0-9_]+$").expect("USERNAME_REGEX is a valid regex pattern")
});

/// A question as authored by a teacher. Presence and range checks happen in
/// the quiz service so that every failure carries the same message.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionInput {
    #[serde(default, alias = "text")]
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answer: Option<i32>,
    pub points: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizRequest {
    #[serde(default)]
    #[validate(length(max = 200))]
    pub title: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[serde(default)]
    #[validate(length(max = 100))]
    pub subject: String,

    #[validate(range(min = 1, max = 600, message = "Time limit must be between 1 and 600 minutes"))]
    pub time_limit: Option<i32>,

    #[serde(default)]
    pub questions: Vec<QuestionInput>,
}

/// Partial update: every `Some` field overwrites the stored value, `None`
/// leaves it untouched. `questions` replaces the whole list.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuizRequest {
    #[validate(length(min = 1, max = 200, message = "Title cannot be empty"))]
    pub title: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Subject cannot be empty"))]
    pub subject: Option<String>,

    #[validate(range(min = 1, max = 600, message = "Time limit must be between 1 and 600 minutes"))]
    pub time_limit: Option<i32>,

    pub is_active: Option<bool>,

    pub questions: Option<Vec<QuestionInput>>,
}

/// `answers[i]` is the option index chosen for question `i`; `null` or a
/// missing trailing entry means the question was skipped. The shape is
/// checked by the scoring service once the quiz is known to be open.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizRequest {
    pub answers: Option<serde_json::Value>,

    #[validate(range(min = 0, message = "Time spent cannot be negative"))]
    pub time_spent: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 3, max = 50),
        regex(path = *USERNAME_REGEX, message = "Username must be alphanumeric with underscores")
    )]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, max = 128, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[serde(default)]
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(
        length(min = 3, max = 50),
        regex(path = *USERNAME_REGEX, message = "Username must be alphanumeric with underscores")
    )]
    pub username: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 6, max = 128, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
}
