use std::{collections::HashMap, sync::Arc};

use mongodb::bson::oid::ObjectId;
use validator::Validate;

use crate::{
    auth::require_owner,
    errors::{AppError, AppResult},
    models::{
        domain::{
            quiz::DEFAULT_TIME_LIMIT_MINUTES, quiz_question::DEFAULT_QUESTION_POINTS, Quiz,
            QuizQuestion, UserRole,
        },
        dto::{
            quiz_dto::{OwnerView, QuizProjection, StudentQuizView, TeacherQuizView},
            request::{CreateQuizRequest, QuestionInput, UpdateQuizRequest},
        },
    },
    repositories::{QuizRepository, UserRepository},
    services::db_helpers::{parse_object_id, unique_ids},
};

const MISSING_FIELDS: &str = "Please provide title, subject, and at least one question";
const INVALID_QUESTION: &str = "Each question must have a question text and at least 2 options";
const INVALID_ANSWER: &str = "Each question must have a valid correct answer";
const INVALID_POINTS: &str = "Question points must be a positive integer";

/// Checks every authored question and converts the list into stored form.
/// Any invalid question rejects the whole list.
pub fn build_questions(inputs: Vec<QuestionInput>) -> AppResult<Vec<QuizQuestion>> {
    if inputs.is_empty() {
        return Err(AppError::ValidationError(MISSING_FIELDS.to_string()));
    }

    inputs
        .into_iter()
        .map(|input| {
            let text = input.question.trim();
            if text.is_empty() || input.options.len() < 2 {
                return Err(AppError::ValidationError(INVALID_QUESTION.to_string()));
            }

            let correct_answer = input
                .correct_answer
                .filter(|&index| index >= 0 && (index as usize) < input.options.len())
                .ok_or_else(|| AppError::ValidationError(INVALID_ANSWER.to_string()))?;

            let points = input.points.unwrap_or(DEFAULT_QUESTION_POINTS);
            if points < 1 {
                return Err(AppError::ValidationError(INVALID_POINTS.to_string()));
            }

            Ok(QuizQuestion::new(text, input.options, correct_answer, points))
        })
        .collect()
}

fn non_blank(value: &str, message: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(message.to_string()));
    }
    Ok(trimmed.to_string())
}

pub struct QuizService {
    quizzes: Arc<dyn QuizRepository>,
    users: Arc<dyn UserRepository>,
}

impl QuizService {
    pub fn new(quizzes: Arc<dyn QuizRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { quizzes, users }
    }

    /// Every quiz, answer keys stripped, regardless of caller.
    pub async fn list_all(&self) -> AppResult<Vec<StudentQuizView>> {
        let quizzes = self.quizzes.find_all().await?;
        self.project_list(quizzes).await
    }

    pub async fn list_active(&self) -> AppResult<Vec<StudentQuizView>> {
        let quizzes = self.quizzes.find_active().await?;
        self.project_list(quizzes).await
    }

    /// Students get the redacted projection; teachers get the answer keys.
    pub async fn get_by_id(&self, id: &str, caller_role: UserRole) -> AppResult<QuizProjection> {
        let quiz = self.load(id).await?;
        let owner = self.owner_of(&quiz).await?;

        Ok(match caller_role {
            UserRole::Student => QuizProjection::Student(StudentQuizView::project(quiz, owner)),
            UserRole::Teacher => QuizProjection::Teacher(TeacherQuizView::project(quiz, owner)),
        })
    }

    pub async fn create(
        &self,
        request: CreateQuizRequest,
        caller_id: &ObjectId,
    ) -> AppResult<TeacherQuizView> {
        request.validate()?;

        let title = non_blank(&request.title, MISSING_FIELDS)?;
        let subject = non_blank(&request.subject, MISSING_FIELDS)?;
        let questions = build_questions(request.questions)?;
        let description = request.description.map(|d| d.trim().to_string());
        let time_limit = request.time_limit.unwrap_or(DEFAULT_TIME_LIMIT_MINUTES);

        let quiz = Quiz::new(&title, description, &subject, time_limit, *caller_id, questions);
        let quiz = self.quizzes.create(quiz).await?;

        log::info!(
            "Quiz {} created by {} with {} questions",
            quiz.id,
            caller_id,
            quiz.questions.len()
        );

        let owner = self.owner_of(&quiz).await?;
        Ok(TeacherQuizView::project(quiz, owner))
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateQuizRequest,
        caller_id: &ObjectId,
    ) -> AppResult<TeacherQuizView> {
        let mut quiz = self.load(id).await?;
        require_owner(caller_id, &quiz.created_by, "update this quiz")?;

        request.validate()?;

        if let Some(title) = request.title {
            quiz.title = non_blank(&title, "Title cannot be empty")?;
        }
        if let Some(description) = request.description {
            quiz.description = Some(description.trim().to_string());
        }
        if let Some(subject) = request.subject {
            quiz.subject = non_blank(&subject, "Subject cannot be empty")?;
        }
        if let Some(time_limit) = request.time_limit {
            quiz.time_limit = time_limit;
        }
        if let Some(is_active) = request.is_active {
            quiz.is_active = is_active;
        }
        if let Some(questions) = request.questions {
            quiz.questions = build_questions(questions)?;
        }

        let quiz = self.quizzes.update(quiz).await?;
        log::info!("Quiz {} updated by {}", quiz.id, caller_id);

        let owner = self.owner_of(&quiz).await?;
        Ok(TeacherQuizView::project(quiz, owner))
    }

    /// Results that reference the quiz are kept.
    pub async fn delete(&self, id: &str, caller_id: &ObjectId) -> AppResult<()> {
        let quiz = self.load(id).await?;
        require_owner(caller_id, &quiz.created_by, "delete this quiz")?;

        self.quizzes.delete(&quiz.id).await?;
        log::info!("Quiz {} deleted by {}", quiz.id, caller_id);
        Ok(())
    }

    async fn load(&self, id: &str) -> AppResult<Quiz> {
        let id = parse_object_id(id, "Quiz")?;
        self.quizzes
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))
    }

    async fn owner_of(&self, quiz: &Quiz) -> AppResult<Option<OwnerView>> {
        let owner = self.users.find_by_id(&quiz.created_by).await?;
        Ok(owner.as_ref().map(OwnerView::from))
    }

    async fn project_list(&self, quizzes: Vec<Quiz>) -> AppResult<Vec<StudentQuizView>> {
        let owner_ids = unique_ids(quizzes.iter().map(|q| q.created_by));
        let owners: HashMap<ObjectId, OwnerView> = self
            .users
            .find_by_ids(&owner_ids)
            .await?
            .iter()
            .map(|user| (user.id, OwnerView::from(user)))
            .collect();

        Ok(quizzes
            .into_iter()
            .map(|quiz| {
                let owner = owners.get(&quiz.created_by).cloned();
                StudentQuizView::project(quiz, owner)
            })
            .collect())
    }
}
