use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Issued once per (user, assessment) passing event. Fields are frozen at issuance.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct Certificate {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub assessment_id: String,
    pub assessment_title: String,
    pub attempt_id: String,
    /// Copied from the passing attempt, never recomputed.
    pub score: i16,
    pub student_name: String,
    pub issued_at: DateTime<Utc>,
}

impl Certificate {
    /// Stable identity for a (user, assessment) pair, so repeated issuance
    /// requests converge on the same certificate.
    pub fn deterministic_id(user_id: &str, assessment_id: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(user_id.as_bytes());
        hasher.update([0x1f]);
        hasher.update(assessment_id.as_bytes());
        let digest = hasher.finalize();

        let hex: String = digest.iter().take(8).map(|b| format!("{:02X}", b)).collect();
        format!("CERT-{hex}")
    }
}
