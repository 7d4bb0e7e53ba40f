use std::sync::Arc;

use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{require_teacher, AuthenticatedUser},
    errors::AppError,
    models::dto::{
        request::{CreateQuizRequest, SubmitQuizRequest, UpdateQuizRequest},
        response::MessageResponse,
    },
};

#[get("/quizzes")]
pub async fn list_quizzes(
    state: web::Data<Arc<AppState>>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quizzes = state.quiz_service.list_all().await?;
    Ok(HttpResponse::Ok().json(quizzes))
}

#[get("/quizzes/active")]
pub async fn list_active_quizzes(
    state: web::Data<Arc<AppState>>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quizzes = state.quiz_service.list_active().await?;
    Ok(HttpResponse::Ok().json(quizzes))
}

#[get("/quizzes/{id}")]
pub async fn get_quiz(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.get_by_id(&id, auth.0.role).await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[post("/quizzes")]
pub async fn create_quiz(
    state: web::Data<Arc<AppState>>,
    request: web::Json<CreateQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_teacher(&auth.0)?;

    let caller_id = auth.0.user_id()?;
    let quiz = state
        .quiz_service
        .create(request.into_inner(), &caller_id)
        .await?;
    Ok(HttpResponse::Created().json(quiz))
}

#[put("/quizzes/{id}")]
pub async fn update_quiz(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    request: web::Json<UpdateQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_teacher(&auth.0)?;

    let caller_id = auth.0.user_id()?;
    let quiz = state
        .quiz_service
        .update(&id, request.into_inner(), &caller_id)
        .await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[delete("/quizzes/{id}")]
pub async fn delete_quiz(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_teacher(&auth.0)?;

    let caller_id = auth.0.user_id()?;
    state.quiz_service.delete(&id, &caller_id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Quiz removed")))
}

#[post("/quizzes/{id}/submit")]
pub async fn submit_quiz(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    request: web::Json<SubmitQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let caller_id = auth.0.user_id()?;
    let response = state
        .scoring_service
        .submit(&id, request.into_inner(), &caller_id, auth.0.is_teacher())
        .await?;
    Ok(HttpResponse::Created().json(response))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use mongodb::bson::oid::ObjectId;
    use serde_json::{json, Value};

    use crate::test_utils::{
        fixtures,
        test_helpers::{app_config, assert_success_status, bearer},
        TestRepositories,
    };

    fn quiz_body() -> Value {
        json!({
            "title": "Planets",
            "subject": "Science",
            "timeLimit": 15,
            "questions": [
                { "text": "Largest planet?", "options": ["Mars", "Jupiter"], "correctAnswer": 1 },
                {
                    "question": "Closest to the sun?",
                    "options": ["Mercury", "Venus", "Earth"],
                    "correctAnswer": 0,
                    "points": 2
                }
            ]
        })
    }

    #[actix_web::test]
    async fn test_requests_without_token_are_rejected() {
        let repos = TestRepositories::new();
        let app = test::init_service(App::new().configure(app_config(repos.app_state()))).await;

        let req = test::TestRequest::get().uri("/api/quizzes").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Not authorized, no token");

        let req = test::TestRequest::get()
            .uri("/api/quizzes")
            .insert_header(("Authorization", "Bearer garbage"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Not authorized, token failed");
    }

    #[actix_web::test]
    async fn test_teacher_creates_and_student_sees_redacted_quiz() {
        let repos = TestRepositories::new();
        let state = repos.app_state();
        let teacher = fixtures::teacher("ms_k");
        let student = fixtures::student("sam");
        repos.users.insert(teacher.clone()).await;
        repos.users.insert(student.clone()).await;
        let app = test::init_service(App::new().configure(app_config(state.clone()))).await;

        let req = test::TestRequest::post()
            .uri("/api/quizzes")
            .insert_header(bearer(&state, &teacher))
            .set_json(quiz_body())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        assert_eq!(created["createdBy"]["username"], "ms_k");
        assert_eq!(created["questions"][1]["correctAnswer"], 0);
        assert_eq!(created["questions"][0]["points"], 1);
        let id = created["_id"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri(&format!("/api/quizzes/{}", id))
            .insert_header(bearer(&state, &student))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_success_status(resp.status());
        let seen: Value = test::read_body_json(resp).await;
        assert_eq!(seen["title"], "Planets");
        for question in seen["questions"].as_array().unwrap() {
            assert!(question.get("correctAnswer").is_none());
        }
    }

    #[actix_web::test]
    async fn test_student_cannot_author_quizzes() {
        let repos = TestRepositories::new();
        let state = repos.app_state();
        let student = fixtures::student("sam");
        let quiz = fixtures::quiz(ObjectId::new(), &[(0, 1)]);
        repos.quizzes.insert(quiz.clone()).await;
        let app = test::init_service(App::new().configure(app_config(state.clone()))).await;

        let create = test::TestRequest::post()
            .uri("/api/quizzes")
            .insert_header(bearer(&state, &student))
            .set_json(quiz_body())
            .to_request();
        let resp = test::call_service(&app, create).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Not authorized as a teacher");

        // Role gate applies before the quiz is even looked up.
        let delete_missing = test::TestRequest::delete()
            .uri(&format!("/api/quizzes/{}", ObjectId::new().to_hex()))
            .insert_header(bearer(&state, &student))
            .to_request();
        let resp = test::call_service(&app, delete_missing).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_non_owner_teacher_is_forbidden() {
        let repos = TestRepositories::new();
        let state = repos.app_state();
        let owner = fixtures::teacher("owner");
        let other = fixtures::teacher("other");
        let quiz = fixtures::quiz(owner.id, &[(0, 1)]);
        repos.quizzes.insert(quiz.clone()).await;
        let app = test::init_service(App::new().configure(app_config(state.clone()))).await;

        let req = test::TestRequest::put()
            .uri(&format!("/api/quizzes/{}", quiz.id.to_hex()))
            .insert_header(bearer(&state, &other))
            .set_json(json!({ "isActive": false }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/quizzes/{}", quiz.id.to_hex()))
            .insert_header(bearer(&state, &owner))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_success_status(resp.status());
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Quiz removed");
    }

    #[actix_web::test]
    async fn test_active_listing_is_not_captured_by_id_route() {
        let repos = TestRepositories::new();
        let state = repos.app_state();
        let student = fixtures::student("sam");
        let mut hidden = fixtures::quiz(ObjectId::new(), &[(0, 1)]);
        hidden.is_active = false;
        repos.quizzes.insert(hidden).await;
        repos.quizzes.insert(fixtures::quiz(ObjectId::new(), &[(0, 1)])).await;
        let app = test::init_service(App::new().configure(app_config(state.clone()))).await;

        let req = test::TestRequest::get()
            .uri("/api/quizzes/active")
            .insert_header(bearer(&state, &student))
            .to_request();
        let active: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(active.as_array().unwrap().len(), 1);

        let req = test::TestRequest::get()
            .uri("/api/quizzes")
            .insert_header(bearer(&state, &student))
            .to_request();
        let all: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(all.as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn test_submit_scores_and_records_result() {
        let repos = TestRepositories::new();
        let state = repos.app_state();
        let student = fixtures::student("sam");
        let quiz = fixtures::quiz(ObjectId::new(), &[(0, 1), (1, 3)]);
        repos.quizzes.insert(quiz.clone()).await;
        let app = test::init_service(App::new().configure(app_config(state.clone()))).await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/quizzes/{}/submit", quiz.id.to_hex()))
            .insert_header(bearer(&state, &student))
            .set_json(json!({ "answers": [2, 1], "timeSpent": 61 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["score"], 75);
        assert_eq!(body["correctCount"], 1);
        assert_eq!(body["totalQuestions"], 2);
        assert_eq!(body["timeSpent"], 61);
        assert_eq!(repos.results.len().await, 1);
    }

    #[actix_web::test]
    async fn test_submit_with_non_list_answers_is_bad_request() {
        let repos = TestRepositories::new();
        let state = repos.app_state();
        let student = fixtures::student("sam");
        let quiz = fixtures::quiz(ObjectId::new(), &[(0, 1)]);
        repos.quizzes.insert(quiz.clone()).await;
        let app = test::init_service(App::new().configure(app_config(state.clone()))).await;

        for body in [json!({ "answers": "0,1" }), json!({})] {
            let req = test::TestRequest::post()
                .uri(&format!("/api/quizzes/{}/submit", quiz.id.to_hex()))
                .insert_header(bearer(&state, &student))
                .set_json(body)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["message"], "Please provide answers");
        }
        assert_eq!(repos.results.len().await, 0);
    }

    #[actix_web::test]
    async fn test_submit_checks_quiz_before_answer_shape() {
        let repos = TestRepositories::new();
        let state = repos.app_state();
        let student = fixtures::student("sam");
        let mut closed = fixtures::quiz(ObjectId::new(), &[(0, 1)]);
        closed.is_active = false;
        repos.quizzes.insert(closed.clone()).await;
        let app = test::init_service(App::new().configure(app_config(state.clone()))).await;

        let cases = [
            (ObjectId::new(), StatusCode::NOT_FOUND, "Quiz not found"),
            (closed.id, StatusCode::BAD_REQUEST, "This quiz is not active"),
        ];
        for (quiz_id, status, message) in cases {
            let req = test::TestRequest::post()
                .uri(&format!("/api/quizzes/{}/submit", quiz_id.to_hex()))
                .insert_header(bearer(&state, &student))
                .set_json(json!({ "answers": "0,1" }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), status);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["message"], message);
        }
        assert_eq!(repos.results.len().await, 0);
    }

    #[actix_web::test]
    async fn test_unknown_quiz_id_is_not_found() {
        let repos = TestRepositories::new();
        let state = repos.app_state();
        let student = fixtures::student("sam");
        let app = test::init_service(App::new().configure(app_config(state.clone()))).await;

        let missing = format!("/api/quizzes/{}", ObjectId::new().to_hex());
        for uri in ["/api/quizzes/not-an-id".to_string(), missing] {
            let req = test::TestRequest::get()
                .uri(&uri)
                .insert_header(bearer(&state, &student))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["message"], "Quiz not found");
        }
    }
}
