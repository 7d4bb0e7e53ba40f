pub mod db_helpers;
pub mod quiz_service;
pub mod result_service;
pub mod scoring_service;
pub mod user_service;

pub use quiz_service::QuizService;
pub use result_service::ResultService;
pub use scoring_service::ScoringService;
pub use user_service::UserService;
