use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use talent_screen::config::ScreeningConfig;
use talent_screen::error::AppError;
use talent_screen::screening::submissions::{
    CandidateNotification, InterviewAssessment, NotificationError, NotificationPublisher,
    PostingRepository, RepositoryError, ScreeningService, StatusChange, SubmissionRecord,
    SubmissionRepository,
};
use talent_screen::screening::{
    InMemoryTemplateRepository, JobPosting, PostingId, SubmissionId, TemplateRepository,
};
use tracing::info;

pub(crate) type AppService = ScreeningService<
    InMemoryPostingRepository,
    InMemorySubmissionRepository,
    InMemoryNotificationPublisher,
>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) templates: Arc<dyn TemplateRepository>,
    pub(crate) service: Arc<AppService>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryPostingRepository {
    postings: Arc<Mutex<HashMap<String, JobPosting>>>,
}

impl PostingRepository for InMemoryPostingRepository {
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
        let Some(existing) = guard.get_mut(&posting.public_id) else {
            return Err(RepositoryError::NotFound);
        };
        *existing = posting.clone();
        Ok(posting)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySubmissionRepository {
    records: Arc<Mutex<HashMap<SubmissionId, SubmissionRecord>>>,
    assessments: Arc<Mutex<HashMap<SubmissionId, Vec<InterviewAssessment>>>>,
    statuses: Arc<Mutex<HashMap<SubmissionId, Vec<StatusChange>>>>,
}

impl SubmissionRepository for InMemorySubmissionRepository {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("submission mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("submission mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_for_posting(
        &self,
        posting_id: &PostingId,
    ) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("submission mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| &record.posting_id == posting_id)
            .cloned()
            .collect())
    }

    fn append_assessment(&self, assessment: InterviewAssessment) -> Result<(), RepositoryError> {
        let records = self.records.lock().expect("submission mutex poisoned");
        if !records.contains_key(&assessment.submission_id) {
            return Err(RepositoryError::NotFound);
        }
        drop(records);

        let mut guard = self.assessments.lock().expect("assessment mutex poisoned");
        guard
            .entry(assessment.submission_id.clone())
            .or_default()
            .push(assessment);
        Ok(())
    }

    fn assessments(&self, id: &SubmissionId) -> Result<Vec<InterviewAssessment>, RepositoryError> {
        let guard = self.assessments.lock().expect("assessment mutex poisoned");
        Ok(guard.get(id).cloned().unwrap_or_default())
    }

    fn append_status(&self, change: StatusChange) -> Result<(), RepositoryError> {
        let records = self.records.lock().expect("submission mutex poisoned");
        if !records.contains_key(&change.submission_id) {
            return Err(RepositoryError::NotFound);
        }
        drop(records);

        let mut guard = self.statuses.lock().expect("status mutex poisoned");
        guard
            .entry(change.submission_id.clone())
            .or_default()
            .push(change);
        Ok(())
    }

    fn status_history(&self, id: &SubmissionId) -> Result<Vec<StatusChange>, RepositoryError> {
        let guard = self.statuses.lock().expect("status mutex poisoned");
        Ok(guard.get(id).cloned().unwrap_or_default())
    }

    fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Vec<SubmissionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("submission mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.candidate.identifier.as_deref() == Some(identifier))
            .cloned()
            .collect())
    }

    fn delete(&self, id: &SubmissionId) -> Result<bool, RepositoryError> {
        let mut records = self.records.lock().expect("submission mutex poisoned");
        if records.remove(id).is_none() {
            return Ok(false);
        }
        drop(records);

        self.assessments
            .lock()
            .expect("assessment mutex poisoned")
            .remove(id);
        self.statuses.lock().expect("status mutex poisoned").remove(id);
        Ok(true)
    }
}

/// Keeps dispatched notifications in memory and logs them; stands in for mail delivery.
#[derive(Default, Clone)]
pub(crate) struct InMemoryNotificationPublisher {
    events: Arc<Mutex<Vec<CandidateNotification>>>,
}

impl NotificationPublisher for InMemoryNotificationPublisher {
    fn publish(&self, notification: CandidateNotification) -> Result<(), NotificationError> {
        info!(
            template = %notification.template,
            submission_id = %notification.submission_id.0,
            public_id = %notification.posting_public_id,
            "recruiter notification queued"
        );
        let mut guard = self.events.lock().expect("notification mutex poisoned");
        guard.push(notification);
        Ok(())
    }
}

impl InMemoryNotificationPublisher {
    pub(crate) fn events(&self) -> Vec<CandidateNotification> {
        self.events.lock().expect("notification mutex poisoned").clone()
    }
}

pub(crate) fn in_memory_service() -> (Arc<AppService>, Arc<InMemoryNotificationPublisher>) {
    let notifications = Arc::new(InMemoryNotificationPublisher::default());
    let service = ScreeningService::new(
        Arc::new(InMemoryPostingRepository::default()),
        Arc::new(InMemorySubmissionRepository::default()),
        notifications.clone(),
    );
    (Arc::new(service), notifications)
}

/// Template library from `SCREENING_TEMPLATES_PATH`, or the built-in presets.
pub(crate) fn load_templates(
    config: &ScreeningConfig,
) -> Result<InMemoryTemplateRepository, AppError> {
    match &config.templates_path {
        Some(path) => {
            let repository = InMemoryTemplateRepository::from_path(path)?;
            info!(path = %path.display(), "loaded screening templates");
            Ok(repository)
        }
        None => Ok(InMemoryTemplateRepository::standard()),
    }
}

pub(crate) fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let file = File::open(path)?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|err| AppError::Input(format!("{}: {err}", path.display())))
}
