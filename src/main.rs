use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};

use lms_assessment_server::{
    app_state::AppState, auth::JwtService, config::Config, graphql::create_schema,
    handlers::configure_routes, middleware::RequestIdMiddleware,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    if let Err(e) = config.validate_for_production() {
        log::error!("Refusing to start: {}", e);
        return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }

    let host = config.web_server_host.clone();
    let port = config.web_server_port;
    let cors_origin = config.cors_allowed_origin.clone();
    let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);

    let state = AppState::new(config).await.map_err(|e| {
        log::error!("Failed to initialise application state: {}", e);
        std::io::Error::other(e.to_string())
    })?;
    let schema = create_schema(state.clone());

    log::info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&cors_origin)
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
            .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(schema.clone()))
            .app_data(web::Data::new(jwt_service.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(RequestIdMiddleware)
            .configure(configure_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
