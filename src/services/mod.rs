pub mod assessment_service;
pub mod attempt_tracker;
pub mod certificate_service;
pub mod enrollment_directory;
pub mod grader;
pub mod keyed_lock;
pub mod question_bank;
pub mod scoring;
