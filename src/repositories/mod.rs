pub mod assessment_repository;
pub mod attempt_repository;
pub mod certificate_repository;
pub mod memory;

pub use assessment_repository::{AssessmentRepository, MongoAssessmentRepository};
pub use attempt_repository::{AttemptRepository, MongoAttemptRepository};
pub use certificate_repository::{CertificateRepository, MongoCertificateRepository};
pub use memory::{
    InMemoryAssessmentRepository, InMemoryAttemptRepository, InMemoryCertificateRepository,
};
