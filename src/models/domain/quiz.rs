use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::domain::quiz_question::QuizQuestion;

pub const DEFAULT_TIME_LIMIT_MINUTES: i32 = 30;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub subject: String,
    pub time_limit: i32, // minutes
    pub is_active: bool,
    pub created_by: ObjectId,
    pub questions: Vec<QuizQuestion>,
    pub created_at: DateTime<Utc>,
}

impl Quiz {
    pub fn new(
        title: &str,
        description: Option<String>,
        subject: &str,
        time_limit: i32,
        created_by: ObjectId,
        questions: Vec<QuizQuestion>,
    ) -> Self {
        Quiz {
            id: ObjectId::new(),
            title: title.to_string(),
            description,
            subject: subject.to_string(),
            time_limit,
            is_active: true,
            created_by,
            questions,
            created_at: Utc::now(),
        }
    }

    pub fn is_owned_by(&self, user_id: &ObjectId) -> bool {
        &self.created_by == user_id
    }
}
