use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState, auth::AuthenticatedUser, errors::AppError,
    models::dto::request::IssueCertificateRequest,
};

#[post("/assessments/{id}/certificate")]
pub async fn issue_certificate(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<IssueCertificateRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let certificate = state
        .certificate_service
        .issue_for_caller(&auth.caller(), &id, &request)
        .await?;
    Ok(HttpResponse::Ok().json(certificate))
}

#[get("/certificates")]
pub async fn list_certificates(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let certificates = state
        .certificate_service
        .list_for_caller(&auth.caller())
        .await?;
    Ok(HttpResponse::Ok().json(certificates))
}

#[get("/certificates/{id}")]
pub async fn get_certificate(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let certificate = state
        .certificate_service
        .get_certificate(&auth.caller(), &id)
        .await?;
    Ok(HttpResponse::Ok().json(certificate))
}
