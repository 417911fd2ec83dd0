//! Candidate submission intake: posting lookup, evaluation, storage and recruiter views.

pub mod domain;
pub mod export;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AssessmentRequest, CandidateInfo, CandidateSubmission, EvaluationRequest, InterviewAssessment,
    PostingDraft, PostingUpdate, StatusChange, StatusRequest, SubmissionDetail, SubmissionRecord,
    SubmissionView,
};
pub use export::{submissions_csv, write_submissions_csv, ExportError};
pub use repository::{
    CandidateNotification, NotificationError, NotificationPublisher, PostingRepository,
    RepositoryError, SubmissionRepository,
};
pub use router::screening_router;
pub use service::{ScreeningService, ScreeningServiceError};
