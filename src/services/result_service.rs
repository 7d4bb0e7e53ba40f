use std::{collections::HashMap, sync::Arc};

use mongodb::bson::oid::ObjectId;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Quiz, QuizResult, User},
        dto::{
            quiz_dto::QuestionWithAnswer,
            response::{ResultDetail, ResultSummary},
        },
    },
    repositories::{QuizRepository, QuizResultRepository, UserRepository},
    services::db_helpers::{parse_object_id, unique_ids},
};

const ANONYMOUS: &str = "Anonymous";

fn summarize(result: QuizResult, quiz: Option<&Quiz>, student: Option<&User>) -> ResultSummary {
    ResultSummary {
        id: result.id.to_hex(),
        quiz_id: result.quiz.to_hex(),
        quiz_title: quiz.map(|q| q.title.clone()),
        quiz_subject: quiz.map(|q| q.subject.clone()),
        student_name: student
            .map(|u| u.username.clone())
            .unwrap_or_else(|| ANONYMOUS.to_string()),
        student_id: student.map(|u| u.id.to_hex()),
        score: result.score,
        answers: result.answers,
        time_spent: result.time_spent,
        date: result.created_at,
    }
}

pub struct ResultService {
    results: Arc<dyn QuizResultRepository>,
    quizzes: Arc<dyn QuizRepository>,
    users: Arc<dyn UserRepository>,
}

impl ResultService {
    pub fn new(
        results: Arc<dyn QuizResultRepository>,
        quizzes: Arc<dyn QuizRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            results,
            quizzes,
            users,
        }
    }

    /// Teachers see every result on quizzes they own; students see their own.
    /// Newest first in both cases.
    pub async fn list_for_caller(
        &self,
        caller_id: &ObjectId,
        caller_is_teacher: bool,
    ) -> AppResult<Vec<ResultSummary>> {
        if caller_is_teacher {
            self.list_for_owner(caller_id).await
        } else {
            self.list_for_student(caller_id).await
        }
    }

    async fn list_for_owner(&self, owner_id: &ObjectId) -> AppResult<Vec<ResultSummary>> {
        let quizzes: HashMap<ObjectId, Quiz> = self
            .quizzes
            .find_by_owner(owner_id)
            .await?
            .into_iter()
            .map(|quiz| (quiz.id, quiz))
            .collect();
        if quizzes.is_empty() {
            return Ok(Vec::new());
        }

        let quiz_ids: Vec<ObjectId> = quizzes.keys().copied().collect();
        let results = self.results.find_by_quizzes(&quiz_ids).await?;

        let students = self.users_by_id(results.iter().map(|r| r.user)).await?;

        Ok(results
            .into_iter()
            .map(|result| {
                let quiz = quizzes.get(&result.quiz);
                let student = students.get(&result.user);
                summarize(result, quiz, student)
            })
            .collect())
    }

    async fn list_for_student(&self, student_id: &ObjectId) -> AppResult<Vec<ResultSummary>> {
        let results = self.results.find_by_user(student_id).await?;
        if results.is_empty() {
            return Ok(Vec::new());
        }

        let student = self.users.find_by_id(student_id).await?;
        let quiz_ids = unique_ids(results.iter().map(|r| r.quiz));
        let quizzes: HashMap<ObjectId, Quiz> = self
            .quizzes
            .find_by_ids(&quiz_ids)
            .await?
            .into_iter()
            .map(|quiz| (quiz.id, quiz))
            .collect();

        Ok(results
            .into_iter()
            .map(|result| {
                let quiz = quizzes.get(&result.quiz);
                summarize(result, quiz, student.as_ref())
            })
            .collect())
    }

    /// A result is visible to the student who submitted it and to the
    /// teacher who owns its quiz. The detail carries the full answer key.
    pub async fn get_one(
        &self,
        result_id: &str,
        caller_id: &ObjectId,
        caller_is_teacher: bool,
    ) -> AppResult<ResultDetail> {
        let result_id = parse_object_id(result_id, "Result")?;
        let result = self
            .results
            .find_by_id(&result_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Result not found".to_string()))?;

        let quiz = self.quizzes.find_by_id(&result.quiz).await?;

        let is_submitter = &result.user == caller_id;
        let is_quiz_owner =
            caller_is_teacher && quiz.as_ref().is_some_and(|q| q.is_owned_by(caller_id));
        if !is_submitter && !is_quiz_owner {
            log::warn!("User {} denied access to result {}", caller_id, result.id);
            return Err(AppError::Forbidden(
                "Not authorized to access this result".to_string(),
            ));
        }

        let student = self.users.find_by_id(&result.user).await?;
        let summary = summarize(result, quiz.as_ref(), student.as_ref());
        let questions = quiz
            .map(|q| q.questions.into_iter().map(QuestionWithAnswer::from).collect())
            .unwrap_or_default();

        Ok(ResultDetail { summary, questions })
    }

    async fn users_by_id(
        &self,
        ids: impl Iterator<Item = ObjectId>,
    ) -> AppResult<HashMap<ObjectId, User>> {
        let ids = unique_ids(ids);
        Ok(self
            .users
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user))
            .collect())
    }
}
