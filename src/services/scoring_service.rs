use std::sync::Arc;

use mongodb::bson::oid::ObjectId;
use serde_json::Value;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{quiz_result::UNANSWERED, QuizQuestion, QuizResult},
        dto::{request::SubmitQuizRequest, response::SubmitQuizResponse},
    },
    repositories::{QuizRepository, QuizResultRepository},
    services::db_helpers::parse_object_id,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grade {
    pub total_points: i64,
    pub max_points: i64,
    pub correct_count: usize,
    pub total_questions: usize,
    pub score: i32,
}

/// Integer percentage of `total` over `max`, rounding halves up.
pub fn percentage(total: i64, max: i64) -> i32 {
    if max <= 0 {
        return 0;
    }
    let total = total.clamp(0, max);
    ((2 * total * 100 + max) / (2 * max)) as i32
}

/// Grades `answers` against `questions` by position. A missing entry counts
/// as unanswered, entries past the last question are ignored.
pub fn grade(questions: &[QuizQuestion], answers: &[i32]) -> Grade {
    let mut total_points = 0i64;
    let mut max_points = 0i64;
    let mut correct_count = 0usize;

    for (index, question) in questions.iter().enumerate() {
        let answer = answers.get(index).copied().unwrap_or(UNANSWERED);
        max_points += i64::from(question.points);

        if question.is_correct(answer) {
            total_points += i64::from(question.points);
            correct_count += 1;
        }
    }

    Grade {
        total_points,
        max_points,
        correct_count,
        total_questions: questions.len(),
        score: percentage(total_points, max_points),
    }
}

/// Accepts only a JSON list. `null` and anything that is not an option
/// index count as unanswered.
fn normalize_answers(answers: Option<&Value>) -> AppResult<Vec<i32>> {
    match answers {
        Some(Value::Array(items)) => Ok(items
            .iter()
            .map(|item| {
                item.as_i64()
                    .and_then(|index| i32::try_from(index).ok())
                    .unwrap_or(UNANSWERED)
            })
            .collect()),
        _ => Err(AppError::ValidationError("Please provide answers".to_string())),
    }
}

pub struct ScoringService {
    quizzes: Arc<dyn QuizRepository>,
    results: Arc<dyn QuizResultRepository>,
}

impl ScoringService {
    pub fn new(quizzes: Arc<dyn QuizRepository>, results: Arc<dyn QuizResultRepository>) -> Self {
        Self { quizzes, results }
    }

    /// Grades a submission and stores it as a new result. Every call
    /// creates a new result, repeated submissions included.
    pub async fn submit(
        &self,
        quiz_id: &str,
        request: SubmitQuizRequest,
        caller_id: &ObjectId,
        caller_is_teacher: bool,
    ) -> AppResult<SubmitQuizResponse> {
        let quiz_id = parse_object_id(quiz_id, "Quiz")?;
        let quiz = self
            .quizzes
            .find_by_id(&quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

        if !quiz.is_active && !caller_is_teacher {
            return Err(AppError::InvalidState("This quiz is not active".to_string()));
        }

        let answers = normalize_answers(request.answers.as_ref())?;
        request.validate()?;
        let time_spent = request.time_spent.unwrap_or(0);

        let grade = grade(&quiz.questions, &answers);
        let result = QuizResult::new(*caller_id, quiz.id, answers, grade.score, time_spent);
        let result = self.results.create(result).await?;

        log::info!(
            "User {} scored {} on quiz {} ({}/{} correct)",
            caller_id,
            grade.score,
            quiz.id,
            grade.correct_count,
            grade.total_questions
        );

        Ok(SubmitQuizResponse {
            id: result.id.to_hex(),
            score: grade.score,
            correct_count: grade.correct_count,
            total_questions: grade.total_questions,
            time_spent,
        })
    }
}
