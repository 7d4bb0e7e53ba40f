pub mod quiz;
pub mod quiz_question;
pub mod quiz_result;
pub mod user;
pub use quiz::Quiz;
pub use quiz_question::QuizQuestion;
pub use quiz_result::QuizResult;
pub use user::{User, UserRole};
