use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{Quiz, QuizQuestion, User};

/// Display fields of a quiz's author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerView {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
}

impl From<&User> for OwnerView {
    fn from(user: &User) -> Self {
        OwnerView {
            id: user.id.to_hex(),
            username: user.username.clone(),
        }
    }
}

/// A question with its answer key, shown to the quiz's teachers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionWithAnswer {
    #[serde(rename = "_id")]
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: i32,
    pub points: i32,
}

impl From<QuizQuestion> for QuestionWithAnswer {
    fn from(question: QuizQuestion) -> Self {
        QuestionWithAnswer {
            id: question.id.to_hex(),
            question: question.question,
            options: question.options,
            correct_answer: question.correct_answer,
            points: question.points,
        }
    }
}

/// A question without its answer key. The type has no `correct_answer`
/// field at all, so the key cannot leak through serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedactedQuestion {
    #[serde(rename = "_id")]
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub points: i32,
}

impl From<QuizQuestion> for RedactedQuestion {
    fn from(question: QuizQuestion) -> Self {
        RedactedQuestion {
            id: question.id.to_hex(),
            question: question.question,
            options: question.options,
            points: question.points,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizView<Q> {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub subject: String,
    pub time_limit: i32,
    pub is_active: bool,
    /// `None` when the author's account no longer exists.
    pub created_by: Option<OwnerView>,
    pub questions: Vec<Q>,
    pub created_at: DateTime<Utc>,
}

pub type TeacherQuizView = QuizView<QuestionWithAnswer>;
pub type StudentQuizView = QuizView<RedactedQuestion>;

impl<Q: From<QuizQuestion>> QuizView<Q> {
    pub fn project(quiz: Quiz, owner: Option<OwnerView>) -> Self {
        QuizView {
            id: quiz.id.to_hex(),
            title: quiz.title,
            description: quiz.description,
            subject: quiz.subject,
            time_limit: quiz.time_limit,
            is_active: quiz.is_active,
            created_by: owner,
            questions: quiz.questions.into_iter().map(Q::from).collect(),
            created_at: quiz.created_at,
        }
    }
}

/// The projection chosen for a single-quiz read, based on the caller's role.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum QuizProjection {
    Teacher(TeacherQuizView),
    Student(StudentQuizView),
}
