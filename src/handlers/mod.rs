pub mod assessment_handler;
pub mod certificate_handler;
pub mod graphql_handler;
pub mod health_handler;

use actix_web::web;

use crate::auth::AuthMiddleware;

pub use assessment_handler::{get_assessment, get_eligibility, list_attempts, submit_assessment};
pub use certificate_handler::{get_certificate, issue_certificate, list_certificates};
pub use graphql_handler::graphql_handler;
pub use health_handler::{health_check, health_check_live, health_check_ready};

/// Health checks are public; everything under `/api` and `/graphql` needs a
/// bearer token.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(health_check_live)
        .service(health_check_ready)
        .service(
            web::scope("/api")
                .wrap(AuthMiddleware)
                .service(get_assessment)
                .service(get_eligibility)
                .service(list_attempts)
                .service(submit_assessment)
                .service(issue_certificate)
                .service(list_certificates)
                .service(get_certificate),
        )
        .service(
            web::resource("/graphql")
                .wrap(AuthMiddleware)
                .route(web::post().to(graphql_handler)),
        );
}
