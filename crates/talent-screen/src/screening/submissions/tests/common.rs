use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::screening::domain::{
    Answer, JobPosting, PostingId, Question, QuestionType, SubmissionId,
};
use crate::screening::submissions::domain::{
    CandidateSubmission, InterviewAssessment, StatusChange, SubmissionRecord,
};
use crate::screening::submissions::repository::{
    CandidateNotification, NotificationError, NotificationPublisher, PostingRepository,
    RepositoryError, SubmissionRepository,
};
use crate::screening::submissions::{screening_router, ScreeningService};

pub(super) const PUBLIC_ID: &str = "JOB-DRI-1740830400";

pub(super) fn posting() -> JobPosting {
    JobPosting {
        id: PostingId("posting-test-1".to_string()),
        public_id: PUBLIC_ID.to_string(),
        title: "Delivery Driver".to_string(),
        questions: vec![
            Question::new("q1", "Do you live in the city?", QuestionType::YesNo, 50.0)
                .with_ideal("yes")
                .knockout()
                .with_skill("Availability"),
            Question::new("q2", "Do you own a vehicle?", QuestionType::YesNo, 30.0)
                .with_ideal("yes")
                .with_category("Experience")
                .with_skill("Mobility"),
            Question::new("q3", "Rate your customer service", QuestionType::Scale1To5, 20.0)
                .with_category("Soft Skills")
                .with_skill("Communication"),
        ],
        critical_skills: vec!["Mobility".to_string()],
        active: true,
        created_at: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
    }
}

pub(super) fn inactive_posting() -> JobPosting {
    let mut posting = posting();
    posting.id = PostingId("posting-test-2".to_string());
    posting.public_id = "JOB-DRI-CLOSED".to_string();
    posting.active = false;
    posting
}

pub(super) fn candidate(name: &str, q1: &str, q2: &str, q3: &str) -> CandidateSubmission {
    CandidateSubmission {
        candidate_name: name.to_string(),
        candidate_identifier: Some(format!("{}-id", name.to_lowercase())),
        answers: vec![
            Answer::new("q1", q1),
            Answer::new("q2", q2),
            Answer::new("q3", q3),
        ],
    }
}

pub(super) type TestService =
    ScreeningService<MemoryPostings, MemorySubmissions, MemoryNotifications>;

pub(super) fn build_service() -> (
    TestService,
    Arc<MemorySubmissions>,
    Arc<MemoryNotifications>,
) {
    let postings = Arc::new(MemoryPostings::default());
    let submissions = Arc::new(MemorySubmissions::default());
    let notifications = Arc::new(MemoryNotifications::default());
    let service = ScreeningService::new(postings, submissions.clone(), notifications.clone());

    service.create_posting(posting()).expect("posting stored");
    service
        .create_posting(inactive_posting())
        .expect("inactive posting stored");

    (service, submissions, notifications)
}

pub(super) fn router_with_service(service: TestService) -> axum::Router {
    screening_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryPostings {
    postings: Arc<Mutex<HashMap<String, JobPosting>>>,
}

impl PostingRepository for MemoryPostings {
    fn insert(&self, posting: JobPosting) -> Result<JobPosting, RepositoryError> {
        let mut guard = self.postings.lock().expect("posting mutex poisoned");
        if guard.contains_key(&posting.public_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(posting.public_id.clone(), posting.clone());
        Ok(posting)
    }

    fn fetch_by_public_id(&self, public_id: &str) -> Result<Option<JobPosting>, RepositoryError> {
        let guard = self.postings.lock().expect("posting mutex poisoned");
        Ok(guard.get(public_id).cloned())
    }

    fn update(&self, posting: JobPosting) -> Result<JobPosting, RepositoryError> {
        let mut guard = self.postings.lock().expect("posting mutex poisoned");
        match guard.get_mut(&posting.public_id) {
            Some(existing) => {
                *existing = posting.clone();
                Ok(posting)
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}

#[derive(Default, Clone)]
pub(super) struct MemorySubmissions {
    records: Arc<Mutex<Vec<SubmissionRecord>>>,
    assessments: Arc<Mutex<Vec<InterviewAssessment>>>,
    statuses: Arc<Mutex<Vec<StatusChange>>>,
}

impl MemorySubmissions {
    pub(super) fn stored(&self) -> Vec<SubmissionRecord> {
        self.records.lock().expect("submission mutex poisoned").clone()
    }
}

impl SubmissionRepository for MemorySubmissions {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("submission mutex poisoned");
        if guard.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("submission mutex poisoned");
        Ok(guard.iter().find(|record| &record.id == id).cloned())
    }

    fn list_for_posting(
        &self,
        posting_id: &PostingId,
    ) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("submission mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| &record.posting_id == posting_id)
            .cloned()
            .collect())
    }

    fn append_assessment(&self, assessment: InterviewAssessment) -> Result<(), RepositoryError> {
        self.assessments
            .lock()
            .expect("assessment mutex poisoned")
            .push(assessment);
        Ok(())
    }

    fn assessments(&self, id: &SubmissionId) -> Result<Vec<InterviewAssessment>, RepositoryError> {
        let guard = self.assessments.lock().expect("assessment mutex poisoned");
        Ok(guard
            .iter()
            .filter(|assessment| &assessment.submission_id == id)
            .cloned()
            .collect())
    }

    fn append_status(&self, change: StatusChange) -> Result<(), RepositoryError> {
        self.statuses
            .lock()
            .expect("status mutex poisoned")
            .push(change);
        Ok(())
    }

    fn status_history(&self, id: &SubmissionId) -> Result<Vec<StatusChange>, RepositoryError> {
        let guard = self.statuses.lock().expect("status mutex poisoned");
        Ok(guard
            .iter()
            .filter(|change| &change.submission_id == id)
            .cloned()
            .collect())
    }

    fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("submission mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| record.candidate.identifier.as_deref() == Some(identifier))
            .cloned()
            .collect())
    }

    fn delete(&self, id: &SubmissionId) -> Result<bool, RepositoryError> {
        let mut records = self.records.lock().expect("submission mutex poisoned");
        let before = records.len();
        records.retain(|record| &record.id != id);
        if records.len() == before {
            return Ok(false);
        }
        self.assessments
            .lock()
            .expect("assessment mutex poisoned")
            .retain(|assessment| &assessment.submission_id != id);
        self.statuses
            .lock()
            .expect("status mutex poisoned")
            .retain(|change| &change.submission_id != id);
        Ok(true)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifications {
    events: Arc<Mutex<Vec<CandidateNotification>>>,
}

impl MemoryNotifications {
    pub(super) fn events(&self) -> Vec<CandidateNotification> {
        self.events.lock().expect("notification mutex poisoned").clone()
    }
}

impl NotificationPublisher for MemoryNotifications {
    fn publish(&self, notification: CandidateNotification) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub(super) struct FailingNotifications;

impl NotificationPublisher for FailingNotifications {
    fn publish(&self, _notification: CandidateNotification) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("smtp offline".to_string()))
    }
}

pub(super) struct UnavailableSubmissions;

impl SubmissionRepository for UnavailableSubmissions {
    fn insert(&self, _record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_for_posting(
        &self,
        _posting_id: &PostingId,
    ) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn append_assessment(&self, _assessment: InterviewAssessment) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn assessments(&self, _id: &SubmissionId) -> Result<Vec<InterviewAssessment>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn append_status(&self, _change: StatusChange) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn status_history(&self, _id: &SubmissionId) -> Result<Vec<StatusChange>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_by_identifier(
        &self,
        _identifier: &str,
    ) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &SubmissionId) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    serde_json::from_slice(&read_body(response).await).expect("json payload")
}
