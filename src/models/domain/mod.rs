pub mod assessment;
pub mod attempt;
pub mod certificate;
pub mod question;
pub mod user;
pub use assessment::Assessment;
pub use attempt::{Attempt, AssessmentState, QuestionOutcome, QuestionResult, SubmittedAnswer};
pub use certificate::Certificate;
pub use question::{Question, QuestionKind, QuestionOption, QuestionType};
pub use user::{Caller, UserRole};
