use std::sync::Arc;

use actix_web::{get, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::UpdateProfileRequest,
};

#[get("/users/profile")]
pub async fn get_profile(
    state: web::Data<Arc<AppState>>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user_id = auth.0.user_id()?;
    let profile = state.user_service.get_profile(&user_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[put("/users/profile")]
pub async fn update_profile(
    state: web::Data<Arc<AppState>>,
    request: web::Json<UpdateProfileRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user_id = auth.0.user_id()?;
    let profile = state
        .user_service
        .update_profile(&user_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[get("/users/results")]
pub async fn list_results(
    state: web::Data<Arc<AppState>>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user_id = auth.0.user_id()?;
    let results = state
        .result_service
        .list_for_caller(&user_id, auth.0.is_teacher())
        .await?;
    Ok(HttpResponse::Ok().json(results))
}

#[get("/users/results/{id}")]
pub async fn get_result(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user_id = auth.0.user_id()?;
    let result = state
        .result_service
        .get_one(&id, &user_id, auth.0.is_teacher())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}
