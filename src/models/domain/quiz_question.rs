use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

pub const DEFAULT_QUESTION_POINTS: i32 = 1;

/// A single multiple-choice question. `correct_answer` indexes into `options`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizQuestion {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: i32,
    #[serde(default = "default_points")]
    pub points: i32,
}

fn default_points() -> i32 {
    DEFAULT_QUESTION_POINTS
}

impl QuizQuestion {
    pub fn new(question: &str, options: Vec<String>, correct_answer: i32, points: i32) -> Self {
        QuizQuestion {
            id: ObjectId::new(),
            question: question.to_string(),
            options,
            correct_answer,
            points,
        }
    }

    pub fn is_correct(&self, answer: i32) -> bool {
        answer == self.correct_answer
    }
}
