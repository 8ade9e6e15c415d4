use secrecy::SecretString;
use std::env;

use crate::errors::{AppError, AppResult};

const DEV_JWT_SECRET: &str = "dev_secret_key_change_in_production";

/// Which Result Store implementation backs the repositories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

impl StoreBackend {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" | "inmemory" => StoreBackend::Memory,
            _ => StoreBackend::Mongo,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub app_env: String,
    pub store_backend: StoreBackend,
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub assessments_collection: String,
    pub attempts_collection: String,
    pub certificates_collection: String,
    pub courses_collection: String,
    pub enrollments_collection: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub jwt_secret: SecretString,
    pub jwt_expiration_hours: i64,
    pub enrollment_directory_url: Option<String>,
    pub seed_file: Option<String>,
    pub cors_allowed_origin: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            store_backend: StoreBackend::parse(
                &env::var("STORE_BACKEND").unwrap_or_else(|_| "mongo".to_string()),
            ),
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME").unwrap_or_else(|_| "lms-local".to_string()),
            assessments_collection: env::var("ASSESSMENTS_COLLECTION")
                .unwrap_or_else(|_| "assessments".to_string()),
            attempts_collection: env::var("ATTEMPTS_COLLECTION")
                .unwrap_or_else(|_| "assessment_attempts".to_string()),
            certificates_collection: env::var("CERTIFICATES_COLLECTION")
                .unwrap_or_else(|_| "certificates".to_string()),
            courses_collection: env::var("COURSES_COLLECTION")
                .unwrap_or_else(|_| "courses".to_string()),
            enrollments_collection: env::var("ENROLLMENTS_COLLECTION")
                .unwrap_or_else(|_| "enrollments".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt_secret: SecretString::from(
                env::var("JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.to_string()),
            ),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(24),
            enrollment_directory_url: env::var("ENROLLMENT_DIRECTORY_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            seed_file: env::var("SEED_FILE").ok().filter(|p| !p.trim().is_empty()),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }

    /// Reject production startup while secrets still carry development values.
    pub fn validate_for_production(&self) -> AppResult<()> {
        use secrecy::ExposeSecret;

        if !self.is_production() {
            return Ok(());
        }

        let jwt_secret = self.jwt_secret.expose_secret();

        if jwt_secret == DEV_JWT_SECRET {
            return Err(AppError::InternalError(
                "JWT_SECRET is using the development default".to_string(),
            ));
        }

        if jwt_secret.len() < 32 {
            return Err(AppError::InternalError(format!(
                "JWT_SECRET is too short ({}). Must be at least 32 characters.",
                jwt_secret.len()
            )));
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            app_env: "test".to_string(),
            store_backend: StoreBackend::Memory,
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "lms-test".to_string(),
            assessments_collection: "assessments".to_string(),
            attempts_collection: "assessment_attempts".to_string(),
            certificates_collection: "certificates".to_string(),
            courses_collection: "courses".to_string(),
            enrollments_collection: "enrollments".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            jwt_secret: SecretString::from("test_jwt_secret_key".to_string()),
            jwt_expiration_hours: 1,
            enrollment_directory_url: None,
            seed_file: None,
            cors_allowed_origin: "http://localhost:3000".to_string(),
        }
    }
}
