use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::domain::{
    AssessmentRequest, CandidateInfo, CandidateSubmission, EvaluationRequest, InterviewAssessment,
    PostingDraft, PostingUpdate, StatusChange, StatusRequest, SubmissionDetail, SubmissionRecord,
};
use super::repository::{
    CandidateNotification, NotificationPublisher, PostingRepository, RepositoryError,
    SubmissionRepository,
};
use crate::screening::domain::{JobPosting, SubmissionId};
use crate::screening::evaluation::{
    EvaluationConfig, EvaluationEngine, EvaluationResult, Verdict,
};
use crate::screening::templates::allocate_posting_ids;

const MAX_ASSESSMENT_SCORE: u8 = 100;
const MAX_STATUS_CHARS: usize = 40;

static SUBMISSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_submission_id() -> SubmissionId {
    let id = SUBMISSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SubmissionId(format!("sub-{id:06}"))
}

/// Service composing the posting store, submission store and scoring engine.
pub struct ScreeningService<P, S, N> {
    postings: Arc<P>,
    submissions: Arc<S>,
    notifications: Arc<N>,
}

impl<P, S, N> ScreeningService<P, S, N>
where
    P: PostingRepository + 'static,
    S: SubmissionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(postings: Arc<P>, submissions: Arc<S>, notifications: Arc<N>) -> Self {
        Self {
            postings,
            submissions,
            notifications,
        }
    }

    /// Stateless evaluation used by previews; nothing is stored.
    pub fn preview(&self, request: EvaluationRequest) -> EvaluationResult {
        let engine = EvaluationEngine::new(EvaluationConfig {
            role_title: request.role_title,
            critical_skills: request.critical_skills,
            ..EvaluationConfig::default()
        });
        engine.evaluate(&request.questions, &request.answers)
    }

    pub fn create_posting(&self, posting: JobPosting) -> Result<JobPosting, ScreeningServiceError> {
        if posting.title.trim().is_empty() {
            return Err(ScreeningServiceError::InvalidPosting(
                "title is required".to_string(),
            ));
        }
        if posting.questions.is_empty() {
            return Err(ScreeningServiceError::InvalidPosting(
                "at least one question is required".to_string(),
            ));
        }

        let stored = self.postings.insert(posting)?;
        info!(
            public_id = %stored.public_id,
            questions = stored.questions.len(),
            "posting created"
        );
        Ok(stored)
    }

    /// Open a posting from a recruiter draft, deriving the public id from the title.
    pub fn open_posting(
        &self,
        draft: PostingDraft,
        now: DateTime<Utc>,
    ) -> Result<JobPosting, ScreeningServiceError> {
        let (id, public_id) = allocate_posting_ids(&draft.title, now);

        self.create_posting(JobPosting {
            id,
            public_id,
            title: draft.title.trim().to_string(),
            questions: draft.questions,
            critical_skills: draft.critical_skills,
            active: true,
            created_at: now,
        })
    }

    /// Edit title, questionnaire, critical skills or the active flag of a posting.
    /// Submissions already stored keep the evaluation they were given.
    pub fn update_posting(
        &self,
        public_id: &str,
        update: PostingUpdate,
    ) -> Result<JobPosting, ScreeningServiceError> {
        let mut posting = self
            .postings
            .fetch_by_public_id(public_id)?
            .ok_or_else(|| ScreeningServiceError::PostingNotFound(public_id.to_string()))?;

        if let Some(title) = update.title {
            let title = title.trim();
            if title.is_empty() {
                return Err(ScreeningServiceError::InvalidPosting(
                    "title is required".to_string(),
                ));
            }
            posting.title = title.to_string();
        }
        if let Some(questions) = update.questions {
            if questions.is_empty() {
                return Err(ScreeningServiceError::InvalidPosting(
                    "at least one question is required".to_string(),
                ));
            }
            posting.questions = questions;
        }
        if let Some(critical_skills) = update.critical_skills {
            posting.critical_skills = critical_skills;
        }
        if let Some(active) = update.active {
            posting.active = active;
        }

        let stored = self.postings.update(posting)?;
        info!(
            public_id = %stored.public_id,
            active = stored.active,
            questions = stored.questions.len(),
            "posting updated"
        );
        Ok(stored)
    }

    /// Evaluate a candidate against an active posting and persist the result verbatim.
    pub fn submit(
        &self,
        public_id: &str,
        submission: CandidateSubmission,
    ) -> Result<SubmissionRecord, ScreeningServiceError> {
        let posting = self.active_posting(public_id)?;

        let name = submission.candidate_name.trim();
        if name.is_empty() {
            return Err(ScreeningServiceError::InvalidSubmission(
                "candidate name is required".to_string(),
            ));
        }

        let engine = EvaluationEngine::new(EvaluationConfig::for_posting(&posting));
        let result = engine.evaluate(&posting.questions, &submission.answers);

        let record = SubmissionRecord {
            id: next_submission_id(),
            posting_id: posting.id.clone(),
            posting_public_id: posting.public_id.clone(),
            candidate: CandidateInfo {
                name: name.to_string(),
                identifier: submission
                    .candidate_identifier
                    .map(|identifier| identifier.trim().to_string())
                    .filter(|identifier| !identifier.is_empty()),
            },
            submitted_at: Utc::now(),
            result,
        };

        let stored = self.submissions.insert(record)?;

        match stored.result.disqualification_reason.as_deref() {
            Some(reason) => warn!(
                submission_id = %stored.id.0,
                public_id = %stored.posting_public_id,
                reason,
                "candidate disqualified by knockout question"
            ),
            None => info!(
                submission_id = %stored.id.0,
                public_id = %stored.posting_public_id,
                score = stored.result.score,
                verdict = stored.result.verdict.label(),
                "submission stored"
            ),
        }

        if stored.result.verdict == Verdict::Recommended {
            self.notify_recommended(&stored);
        }

        Ok(stored)
    }

    pub fn get(&self, submission_id: &SubmissionId) -> Result<SubmissionDetail, ScreeningServiceError> {
        let record = self
            .submissions
            .fetch(submission_id)?
            .ok_or_else(|| ScreeningServiceError::SubmissionNotFound(submission_id.0.clone()))?;
        let assessments = self.submissions.assessments(submission_id)?;
        let status_history = self.submissions.status_history(submission_id)?;
        Ok(SubmissionDetail {
            record,
            assessments,
            status: status_history.last().map(|change| change.status.clone()),
            status_history,
        })
    }

    /// Every submission filed under a candidate identifier, most recent first.
    pub fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Vec<SubmissionRecord>, ScreeningServiceError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(ScreeningServiceError::InvalidSubmission(
                "candidate identifier is required".to_string(),
            ));
        }

        let mut records = self.submissions.find_by_identifier(identifier)?;
        records.sort_by(|left, right| {
            right
                .submitted_at
                .cmp(&left.submitted_at)
                .then_with(|| right.id.cmp(&left.id))
        });
        Ok(records)
    }

    pub fn delete_submission(
        &self,
        submission_id: &SubmissionId,
    ) -> Result<(), ScreeningServiceError> {
        if !self.submissions.delete(submission_id)? {
            return Err(ScreeningServiceError::SubmissionNotFound(
                submission_id.0.clone(),
            ));
        }
        info!(submission_id = %submission_id.0, "submission deleted");
        Ok(())
    }

    /// Stored submissions of a posting, best score first, earlier submissions first on ties.
    pub fn ranking(&self, public_id: &str) -> Result<Vec<SubmissionRecord>, ScreeningServiceError> {
        let posting = self
            .postings
            .fetch_by_public_id(public_id)?
            .ok_or_else(|| ScreeningServiceError::PostingNotFound(public_id.to_string()))?;

        let mut records = self.submissions.list_for_posting(&posting.id)?;
        records.sort_by(|left, right| {
            right
                .result
                .score
                .total_cmp(&left.result.score)
                .then_with(|| left.submitted_at.cmp(&right.submitted_at))
                .then_with(|| left.id.cmp(&right.id))
        });
        Ok(records)
    }

    /// Append an interview assessment; the stored evaluation is left untouched.
    pub fn record_assessment(
        &self,
        submission_id: &SubmissionId,
        request: AssessmentRequest,
    ) -> Result<InterviewAssessment, ScreeningServiceError> {
        let interviewer = request.interviewer.trim();
        if interviewer.is_empty() {
            return Err(ScreeningServiceError::InvalidAssessment(
                "interviewer is required".to_string(),
            ));
        }
        if request.score > MAX_ASSESSMENT_SCORE {
            return Err(ScreeningServiceError::InvalidAssessment(format!(
                "score must be between 0 and {MAX_ASSESSMENT_SCORE}"
            )));
        }

        if self.submissions.fetch(submission_id)?.is_none() {
            return Err(ScreeningServiceError::SubmissionNotFound(
                submission_id.0.clone(),
            ));
        }

        let assessment = InterviewAssessment {
            submission_id: submission_id.clone(),
            interviewer: interviewer.to_string(),
            score: request.score,
            notes: request.notes.trim().to_string(),
            recorded_at: Utc::now(),
        };
        self.submissions.append_assessment(assessment.clone())?;
        info!(
            submission_id = %submission_id.0,
            score = assessment.score,
            "interview assessment recorded"
        );
        Ok(assessment)
    }

    /// Move a candidate through the recruiter pipeline. Each move is appended to the
    /// history; the stored evaluation is left untouched.
    pub fn update_status(
        &self,
        submission_id: &SubmissionId,
        request: StatusRequest,
    ) -> Result<StatusChange, ScreeningServiceError> {
        let status = request.status.trim();
        if status.is_empty() {
            return Err(ScreeningServiceError::InvalidStatus(
                "status is required".to_string(),
            ));
        }
        if status.chars().count() > MAX_STATUS_CHARS {
            return Err(ScreeningServiceError::InvalidStatus(format!(
                "status must be at most {MAX_STATUS_CHARS} characters"
            )));
        }

        if self.submissions.fetch(submission_id)?.is_none() {
            return Err(ScreeningServiceError::SubmissionNotFound(
                submission_id.0.clone(),
            ));
        }

        let change = StatusChange {
            submission_id: submission_id.clone(),
            status: status.to_string(),
            notes: request.notes.trim().to_string(),
            changed_at: Utc::now(),
        };
        self.submissions.append_status(change.clone())?;
        info!(
            submission_id = %submission_id.0,
            status = %change.status,
            "candidate status updated"
        );
        Ok(change)
    }

    fn active_posting(&self, public_id: &str) -> Result<JobPosting, ScreeningServiceError> {
        let posting = self
            .postings
            .fetch_by_public_id(public_id)?
            .ok_or_else(|| ScreeningServiceError::PostingNotFound(public_id.to_string()))?;
        if !posting.active {
            return Err(ScreeningServiceError::PostingInactive(public_id.to_string()));
        }
        Ok(posting)
    }

    // A failed notification never rolls back the stored submission.
    fn notify_recommended(&self, record: &SubmissionRecord) {
        let mut details = BTreeMap::new();
        details.insert("candidate".to_string(), record.candidate.name.clone());
        details.insert("score".to_string(), format!("{:.1}", record.result.score));
        details.insert(
            "recommendation".to_string(),
            record.result.recommendation.label().to_string(),
        );

        let notification = CandidateNotification {
            template: "candidate_recommended".to_string(),
            submission_id: record.id.clone(),
            posting_public_id: record.posting_public_id.clone(),
            details,
        };

        if let Err(error) = self.notifications.publish(notification) {
            warn!(
                submission_id = %record.id.0,
                %error,
                "recommended candidate notification failed"
            );
        }
    }
}

/// Error raised by the screening service.
#[derive(Debug, thiserror::Error)]
pub enum ScreeningServiceError {
    #[error("posting {0} not found")]
    PostingNotFound(String),
    #[error("posting {0} is not accepting submissions")]
    PostingInactive(String),
    #[error("submission {0} not found")]
    SubmissionNotFound(String),
    #[error("invalid posting: {0}")]
    InvalidPosting(String),
    #[error("invalid submission: {0}")]
    InvalidSubmission(String),
    #[error("invalid assessment: {0}")]
    InvalidAssessment(String),
    #[error("invalid status: {0}")]
    InvalidStatus(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
