use std::sync::Arc;

use crate::{
    config::{Config, StoreBackend},
    db::{seed::SeedData, Database},
    errors::AppResult,
    repositories::{
        AssessmentRepository, AttemptRepository, CertificateRepository,
        InMemoryAssessmentRepository, InMemoryAttemptRepository, InMemoryCertificateRepository,
        MongoAssessmentRepository, MongoAttemptRepository, MongoCertificateRepository,
    },
    services::{
        assessment_service::AssessmentService,
        certificate_service::CertificateService,
        enrollment_directory::{
            EnrollmentDirectory, HttpEnrollmentDirectory, InMemoryEnrollmentDirectory,
            MongoEnrollmentDirectory,
        },
        question_bank::QuestionBank,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub assessment_service: Arc<AssessmentService>,
    pub certificate_service: Arc<CertificateService>,
    /// `None` when running on the in-memory store.
    pub db: Option<Database>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let seed = match &config.seed_file {
            Some(path) => Some(SeedData::load(path).await?),
            None => None,
        };

        match config.store_backend {
            StoreBackend::Mongo => Self::with_mongo(config, seed).await,
            StoreBackend::Memory => Self::with_memory(config, seed).await,
        }
    }

    async fn with_mongo(config: Config, seed: Option<SeedData>) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let assessments = Arc::new(MongoAssessmentRepository::new(
            &db,
            &config.assessments_collection,
        ));
        assessments.ensure_indexes().await?;
        let attempts = Arc::new(MongoAttemptRepository::new(&db, &config.attempts_collection));
        attempts.ensure_indexes().await?;
        let certificates = Arc::new(MongoCertificateRepository::new(
            &db,
            &config.certificates_collection,
        ));
        certificates.ensure_indexes().await?;

        let directory: Arc<dyn EnrollmentDirectory> = match &config.enrollment_directory_url {
            Some(url) => {
                log_ignored_enrollments(seed.as_ref());
                Arc::new(HttpEnrollmentDirectory::new(url))
            }
            None => {
                let directory = MongoEnrollmentDirectory::new(
                    &db,
                    &config.courses_collection,
                    &config.enrollments_collection,
                );
                if let Some(seed) = &seed {
                    for enrollment in &seed.enrollments {
                        directory
                            .enroll(&enrollment.user_id, &enrollment.course_id)
                            .await?;
                    }
                }
                Arc::new(directory)
            }
        };

        if let Some(seed) = &seed {
            seed.apply_assessments(assessments.as_ref()).await?;
        }

        log::info!("Using MongoDB result store");
        Ok(Self::from_repositories(
            config,
            Some(db),
            assessments,
            attempts,
            certificates,
            directory,
        ))
    }

    async fn with_memory(config: Config, seed: Option<SeedData>) -> AppResult<Self> {
        let assessments = Arc::new(InMemoryAssessmentRepository::new());

        let directory: Arc<dyn EnrollmentDirectory> = match &config.enrollment_directory_url {
            Some(url) => {
                log_ignored_enrollments(seed.as_ref());
                Arc::new(HttpEnrollmentDirectory::new(url))
            }
            None => {
                let directory = InMemoryEnrollmentDirectory::new();
                if let Some(seed) = &seed {
                    for course_id in seed.course_ids() {
                        directory.add_course(&course_id).await;
                    }
                    for enrollment in &seed.enrollments {
                        directory
                            .enroll(&enrollment.user_id, &enrollment.course_id)
                            .await;
                    }
                }
                Arc::new(directory)
            }
        };

        if let Some(seed) = &seed {
            seed.apply_assessments(assessments.as_ref()).await?;
        }

        log::warn!("Using in-memory result store; attempts and certificates are lost on restart");
        Ok(Self::from_repositories(
            config,
            None,
            assessments,
            Arc::new(InMemoryAttemptRepository::new()),
            Arc::new(InMemoryCertificateRepository::new()),
            directory,
        ))
    }

    pub fn from_repositories(
        config: Config,
        db: Option<Database>,
        assessments: Arc<dyn AssessmentRepository>,
        attempts: Arc<dyn AttemptRepository>,
        certificates: Arc<dyn CertificateRepository>,
        directory: Arc<dyn EnrollmentDirectory>,
    ) -> Self {
        let question_bank = Arc::new(QuestionBank::new(assessments));

        Self {
            assessment_service: Arc::new(AssessmentService::new(
                question_bank.clone(),
                attempts.clone(),
                directory,
            )),
            certificate_service: Arc::new(CertificateService::new(
                question_bank,
                attempts,
                certificates,
            )),
            db,
            config: Arc::new(config),
        }
    }
}

fn log_ignored_enrollments(seed: Option<&SeedData>) {
    if seed.is_some_and(|s| !s.enrollments.is_empty()) {
        log::warn!("Seed enrollments ignored: enrollment lookups go to the external directory");
    }
}
