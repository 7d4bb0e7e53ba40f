use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Marker stored for a question the student left unanswered.
pub const UNANSWERED: i32 = -1;

/// One submitted attempt. Written once on submission and never modified.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizResult {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user: ObjectId,
    pub quiz: ObjectId,
    pub answers: Vec<i32>,
    pub score: i32,
    #[serde(default)]
    pub time_spent: i64, // seconds
    pub created_at: DateTime<Utc>,
}

impl QuizResult {
    pub fn new(
        user: ObjectId,
        quiz: ObjectId,
        answers: Vec<i32>,
        score: i32,
        time_spent: i64,
    ) -> Self {
        QuizResult {
            id: ObjectId::new(),
            user,
            quiz,
            answers,
            score,
            time_spent,
            created_at: Utc::now(),
        }
    }
}
