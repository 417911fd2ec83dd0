use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{InterviewAssessment, StatusChange, SubmissionRecord};
use crate::screening::domain::{JobPosting, PostingId, SubmissionId};

/// Job posting store consulted before every submission.
pub trait PostingRepository: Send + Sync {
    fn insert(&self, posting: JobPosting) -> Result<JobPosting, RepositoryError>;
    fn fetch_by_public_id(&self, public_id: &str) -> Result<Option<JobPosting>, RepositoryError>;
    /// Replace the posting stored under `posting.public_id`; `NotFound` when absent.
    fn update(&self, posting: JobPosting) -> Result<JobPosting, RepositoryError>;
}

/// Storage abstraction for evaluated submissions and their later assessments.
pub trait SubmissionRepository: Send + Sync {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError>;
    fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError>;
    fn list_for_posting(
        &self,
        posting_id: &PostingId,
    ) -> Result<Vec<SubmissionRecord>, RepositoryError>;
    fn append_assessment(&self, assessment: InterviewAssessment) -> Result<(), RepositoryError>;
    fn assessments(&self, id: &SubmissionId) -> Result<Vec<InterviewAssessment>, RepositoryError>;
    fn append_status(&self, change: StatusChange) -> Result<(), RepositoryError>;
    fn status_history(&self, id: &SubmissionId) -> Result<Vec<StatusChange>, RepositoryError>;
    fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Vec<SubmissionRecord>, RepositoryError>;
    /// Remove the record with its assessments and status history. Returns `false` when absent.
    fn delete(&self, id: &SubmissionId) -> Result<bool, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound recruiter notifications (e-mail, chat or ATS webhooks).
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notification: CandidateNotification) -> Result<(), NotificationError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateNotification {
    pub template: String,
    pub submission_id: SubmissionId,
    pub posting_public_id: String,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
