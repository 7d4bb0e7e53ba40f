use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::{
    app_state::AppState,
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{Quiz, QuizQuestion, QuizResult, User, UserRole},
    repositories::{QuizRepository, QuizResultRepository, UserRepository},
};

pub mod fixtures {
    use super::*;
    use crate::models::domain::quiz::DEFAULT_TIME_LIMIT_MINUTES;

    /// Three-option question whose answer key is `correct_answer`.
    pub fn question(correct_answer: i32, points: i32) -> QuizQuestion {
        QuizQuestion::new(
            &format!("Question worth {}", points),
            vec!["A".to_string(), "B".to_string(), "C".to_string()],
            correct_answer,
            points,
        )
    }

    /// Active quiz owned by `owner` with one question per `(correct, points)` pair.
    pub fn quiz(owner: ObjectId, keys: &[(i32, i32)]) -> Quiz {
        Quiz::new(
            "Sample Quiz",
            Some("Fixture".to_string()),
            "Math",
            DEFAULT_TIME_LIMIT_MINUTES,
            owner,
            keys.iter().map(|(c, p)| question(*c, *p)).collect(),
        )
    }

    pub fn teacher(username: &str) -> User {
        User::test_user(username, UserRole::Teacher)
    }

    pub fn student(username: &str) -> User {
        User::test_user(username, UserRole::Student)
    }
}

#[derive(Default)]
pub struct InMemoryQuizRepository {
    quizzes: Arc<RwLock<HashMap<ObjectId, Quiz>>>,
}

impl InMemoryQuizRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, quiz: Quiz) {
        self.quizzes.write().await.insert(quiz.id, quiz);
    }

    async fn filtered(&self, keep: impl Fn(&Quiz) -> bool) -> Vec<Quiz> {
        let quizzes = self.quizzes.read().await;
        let mut items: Vec<_> = quizzes.values().filter(|q| keep(q)).cloned().collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        items
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Quiz>> {
        Ok(self.quizzes.read().await.get(id).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Quiz>> {
        Ok(self.filtered(|_| true).await)
    }

    async fn find_active(&self) -> AppResult<Vec<Quiz>> {
        Ok(self.filtered(|q| q.is_active).await)
    }

    async fn find_by_owner(&self, owner_id: &ObjectId) -> AppResult<Vec<Quiz>> {
        Ok(self.filtered(|q| &q.created_by == owner_id).await)
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> AppResult<Vec<Quiz>> {
        Ok(self.filtered(|q| ids.contains(&q.id)).await)
    }

    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        if quizzes.contains_key(&quiz.id) {
            return Err(AppError::DatabaseError(format!("Duplicate quiz id {}", quiz.id)));
        }
        quizzes.insert(quiz.id, quiz.clone());
        Ok(quiz)
    }

    async fn update(&self, quiz: Quiz) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        if !quizzes.contains_key(&quiz.id) {
            return Err(AppError::NotFound("Quiz not found".to_string()));
        }
        quizzes.insert(quiz.id, quiz.clone());
        Ok(quiz)
    }

    async fn delete(&self, id: &ObjectId) -> AppResult<()> {
        if self.quizzes.write().await.remove(id).is_none() {
            return Err(AppError::NotFound("Quiz not found".to_string()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryQuizResultRepository {
    results: Arc<RwLock<Vec<QuizResult>>>,
}

impl InMemoryQuizResultRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, result: QuizResult) {
        self.results.write().await.push(result);
    }

    pub async fn len(&self) -> usize {
        self.results.read().await.len()
    }

    async fn newest_first(&self, keep: impl Fn(&QuizResult) -> bool) -> Vec<QuizResult> {
        let results = self.results.read().await;
        let mut items: Vec<_> = results.iter().filter(|r| keep(r)).cloned().collect();
        items.sort_by(|a, b| b.id.cmp(&a.id));
        items
    }
}

#[async_trait]
impl QuizResultRepository for InMemoryQuizResultRepository {
    async fn create(&self, result: QuizResult) -> AppResult<QuizResult> {
        self.results.write().await.push(result.clone());
        Ok(result)
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<QuizResult>> {
        let results = self.results.read().await;
        Ok(results.iter().find(|r| &r.id == id).cloned())
    }

    async fn find_by_user(&self, user_id: &ObjectId) -> AppResult<Vec<QuizResult>> {
        Ok(self.newest_first(|r| &r.user == user_id).await)
    }

    async fn find_by_quizzes(&self, quiz_ids: &[ObjectId]) -> AppResult<Vec<QuizResult>> {
        Ok(self.newest_first(|r| quiz_ids.contains(&r.quiz)).await)
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<ObjectId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    fn conflicts(users: &HashMap<ObjectId, User>, candidate: &User) -> bool {
        users.values().any(|u| {
            u.id != candidate.id && (u.username == candidate.username || u.email == candidate.email)
        })
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if Self::conflicts(&users, &user) {
            return Err(AppError::ValidationError("User already exists".to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> AppResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = email.to_lowercase();
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn update(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        if Self::conflicts(&users, &user) {
            return Err(AppError::ValidationError("User already exists".to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }
}

/// Shared in-memory store used to build services and app state in tests.
#[derive(Clone, Default)]
pub struct TestRepositories {
    pub quizzes: Arc<InMemoryQuizRepository>,
    pub results: Arc<InMemoryQuizResultRepository>,
    pub users: Arc<InMemoryUserRepository>,
}

impl TestRepositories {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn app_state(&self) -> AppState {
        AppState::with_repositories(
            Config::test_config(),
            self.quizzes.clone(),
            self.results.clone(),
            self.users.clone(),
            None,
        )
    }
}

pub mod test_helpers {
    use std::sync::Arc;

    use actix_web::{http::StatusCode, web};

    use crate::{app_state::AppState, handlers::configure_routes, models::domain::User};

    /// Route table plus the app data the handlers and auth middleware expect.
    pub fn app_config(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
        move |cfg| {
            cfg.app_data(web::Data::from(state.jwt_service.clone()))
                .app_data(web::Data::new(Arc::new(state)));
            configure_routes(cfg);
        }
    }

    pub fn bearer(state: &AppState, user: &User) -> (&'static str, String) {
        let token = state
            .jwt_service
            .create_token(user)
            .expect("token should be issued");
        ("Authorization", format!("Bearer {}", token))
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[tokio::test]
    async fn quiz_repository_crud_and_error_paths() {
        let repo = InMemoryQuizRepository::new();
        let owner = ObjectId::new();

        let mut quiz = quiz(owner, &[(0, 1)]);
        repo.create(quiz.clone()).await.expect("create quiz");
        assert!(repo.create(quiz.clone()).await.is_err());

        quiz.is_active = false;
        repo.update(quiz.clone()).await.expect("update quiz");
        assert!(repo.find_active().await.unwrap().is_empty());
        assert_eq!(repo.find_by_owner(&owner).await.unwrap().len(), 1);

        repo.delete(&quiz.id).await.expect("delete quiz");
        assert!(matches!(repo.delete(&quiz.id).await, Err(AppError::NotFound(_))));
        assert!(matches!(repo.update(quiz).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn user_repository_rejects_duplicates() {
        let repo = InMemoryUserRepository::new();
        repo.create(student("alice")).await.expect("create alice");

        let duplicate = repo.create(student("alice")).await;
        assert!(matches!(duplicate, Err(AppError::ValidationError(_))));

        let found = repo.find_by_email("ALICE@example.com").await.unwrap();
        assert!(found.is_some());
    }
}
