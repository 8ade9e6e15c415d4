use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    middleware::get_request_id,
    models::dto::request::{PaginationParams, SubmitAssessmentRequest},
};

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub user_id: Option<String>,
}

#[get("/assessments/{id}")]
pub async fn get_assessment(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let assessment = state
        .assessment_service
        .get_public_assessment(&auth.caller(), &id)
        .await?;
    Ok(HttpResponse::Ok().json(assessment))
}

#[get("/assessments/{id}/eligibility")]
pub async fn get_eligibility(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let eligibility = state
        .assessment_service
        .check_eligibility(&auth.caller(), &id)
        .await?;
    Ok(HttpResponse::Ok().json(eligibility))
}

#[post("/submissions")]
pub async fn submit_assessment(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<SubmitAssessmentRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    log::debug!(
        "Submission for assessment {} (request {})",
        request.assessment_id,
        get_request_id(&req).unwrap_or_default()
    );

    let response = state
        .assessment_service
        .submit(&auth.caller(), &request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(response))
}

#[get("/assessments/{id}/attempts")]
pub async fn list_attempts(
    state: web::Data<AppState>,
    id: web::Path<String>,
    query: web::Query<HistoryQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let pagination = PaginationParams {
        offset: query.offset,
        limit: query.limit,
    };

    let page = state
        .assessment_service
        .attempt_history(&auth.caller(), &id, query.user_id.as_deref(), &pagination)
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthMiddleware, JwtService};
    use crate::models::domain::UserRole;
    use crate::test_utils::test_helpers::{
        assert_error_status, assert_success_status, seeded_state,
    };
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    macro_rules! test_app {
        ($state:expr, $jwt:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state))
                    .app_data(web::Data::new($jwt))
                    .service(
                        web::scope("/api")
                            .wrap(AuthMiddleware)
                            .service(get_assessment)
                            .service(get_eligibility)
                            .service(submit_assessment)
                            .service(list_attempts),
                    ),
            )
            .await
        };
    }

    fn bearer(jwt: &JwtService, user_id: &str, role: UserRole) -> (String, String) {
        let token = jwt.create_token(user_id, user_id, role).unwrap();
        ("Authorization".to_string(), format!("Bearer {}", token))
    }

    #[actix_web::test]
    async fn test_missing_token_is_unauthorized() {
        let (state, jwt) = seeded_state().await;
        let app = test_app!(state, jwt);

        let req = test::TestRequest::get()
            .uri("/api/assessments/assessment-1")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_get_assessment_is_redacted() {
        let (state, jwt) = seeded_state().await;
        let auth = bearer(&jwt, "user-1", UserRole::User);
        let app = test_app!(state, jwt);

        let req = test::TestRequest::get()
            .uri("/api/assessments/assessment-1")
            .insert_header(auth)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_success_status(resp.status());

        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(!body.contains("is_correct"));
        assert!(!body.contains("correct_answer"));
        assert!(!body.contains("keywords"));
    }

    #[actix_web::test]
    async fn test_not_enrolled_user_is_forbidden() {
        let (state, jwt) = seeded_state().await;
        let auth = bearer(&jwt, "stranger", UserRole::User);
        let app = test_app!(state, jwt);

        let req = test::TestRequest::get()
            .uri("/api/assessments/assessment-1/eligibility")
            .insert_header(auth)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_submit_and_list_attempts() {
        let (state, jwt) = seeded_state().await;
        let auth = bearer(&jwt, "user-1", UserRole::User);
        let app = test_app!(state, jwt);

        let req = test::TestRequest::post()
            .uri("/api/submissions")
            .insert_header(auth.clone())
            .set_json(json!({
                "assessment_id": "assessment-1",
                "answers": [
                    {"question_id": "mc", "answer": "1"},
                    {"question_id": "tf", "answer": "False"},
                    {"question_id": "sa", "answer": " let "}
                ]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["earned_points"], 4);
        assert_eq!(body["total_points"], 7);
        assert_eq!(body["score"], 57);
        assert_eq!(body["passed"], false);
        assert_eq!(body["can_retake"], true);
        assert_eq!(body["detailed_results"][0]["correct_answer"], "London");

        let req = test::TestRequest::get()
            .uri("/api/assessments/assessment-1/attempts")
            .insert_header(auth)
            .to_request();
        let page: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(page["pagination"]["total"], 1);
        assert_eq!(page["items"][0]["attempt_number"], 1);
    }

    #[actix_web::test]
    async fn test_malformed_submission_lists_fields() {
        let (state, jwt) = seeded_state().await;
        let auth = bearer(&jwt, "user-1", UserRole::User);
        let app = test_app!(state, jwt);

        let req = test::TestRequest::post()
            .uri("/api/submissions")
            .insert_header(auth)
            .set_json(json!({
                "assessment_id": "assessment-1",
                "answers": [{"question_id": "", "answer": "x"}]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_error_status(resp.status());
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error_code"], "VALIDATION_ERROR");
        assert_eq!(body["fields"][0]["field"], "answers[0].question_id");
    }

    #[actix_web::test]
    async fn test_unknown_assessment_is_not_found() {
        let (state, jwt) = seeded_state().await;
        let auth = bearer(&jwt, "user-1", UserRole::User);
        let app = test_app!(state, jwt);

        let req = test::TestRequest::get()
            .uri("/api/assessments/missing")
            .insert_header(auth)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
