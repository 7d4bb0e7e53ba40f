use std::sync::Arc;

use crate::{
    auth::JwtService,
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        MongoQuizRepository, MongoQuizResultRepository, MongoUserRepository, QuizRepository,
        QuizResultRepository, UserRepository,
    },
    services::{QuizService, ResultService, ScoringService, UserService},
};

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: Arc<QuizService>,
    pub scoring_service: Arc<ScoringService>,
    pub result_service: Arc<ResultService>,
    pub user_service: Arc<UserService>,
    pub jwt_service: Arc<JwtService>,
    /// `None` when the state is built over non-Mongo repositories.
    pub db: Option<Database>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let quiz_repository = Arc::new(MongoQuizRepository::new(&db, &config.quizzes_collection));
        quiz_repository.ensure_indexes().await?;

        let result_repository = Arc::new(MongoQuizResultRepository::new(
            &db,
            &config.results_collection,
        ));
        result_repository.ensure_indexes().await?;

        let user_repository = Arc::new(MongoUserRepository::new(&db, &config.users_collection));
        user_repository.ensure_indexes().await?;

        Ok(Self::with_repositories(
            config,
            quiz_repository,
            result_repository,
            user_repository,
            Some(db),
        ))
    }

    pub fn with_repositories(
        config: Config,
        quizzes: Arc<dyn QuizRepository>,
        results: Arc<dyn QuizResultRepository>,
        users: Arc<dyn UserRepository>,
        db: Option<Database>,
    ) -> Self {
        let jwt_service = Arc::new(JwtService::new(
            &config.jwt_secret,
            config.jwt_expiration_hours,
        ));

        Self {
            quiz_service: Arc::new(QuizService::new(quizzes.clone(), users.clone())),
            scoring_service: Arc::new(ScoringService::new(quizzes.clone(), results.clone())),
            result_service: Arc::new(ResultService::new(results, quizzes, users.clone())),
            user_service: Arc::new(UserService::new(users, jwt_service.clone())),
            jwt_service,
            db,
            config: Arc::new(config),
        }
    }
}
