pub mod auth_handler;
pub mod health_handler;
pub mod quiz_handler;
pub mod user_handler;

use actix_web::web;

use crate::{auth::AuthMiddleware, errors::AppError};

/// Registers every route. Register and login sit outside the `/api` scope
/// so the auth middleware does not see them.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into());

    cfg.app_data(json_config)
        .service(health_handler::health_check)
        .service(health_handler::health_check_ready)
        .service(auth_handler::register)
        .service(auth_handler::login)
        .service(
            web::scope("/api")
                .wrap(AuthMiddleware)
                .service(auth_handler::me)
                .service(quiz_handler::list_quizzes)
                .service(quiz_handler::list_active_quizzes)
                .service(quiz_handler::get_quiz)
                .service(quiz_handler::create_quiz)
                .service(quiz_handler::update_quiz)
                .service(quiz_handler::delete_quiz)
                .service(quiz_handler::submit_quiz)
                .service(user_handler::get_profile)
                .service(user_handler::update_profile)
                .service(user_handler::list_results)
                .service(user_handler::get_result),
        );
}
