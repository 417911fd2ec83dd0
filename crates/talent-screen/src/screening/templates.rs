//! Preset questionnaire libraries that recruiters clone into new postings.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{JobPosting, PostingId, Question, QuestionType};

static POSTING_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Allocate a store id and a public id of the form `JOB-<ABC>-<unix seconds>-<sequence>`,
/// where `ABC` is the first three alphanumerics of `label`.
pub(crate) fn allocate_posting_ids(label: &str, now: DateTime<Utc>) -> (PostingId, String) {
    let sequence = POSTING_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let prefix: String = label
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(3)
        .map(|ch| ch.to_ascii_uppercase())
        .collect();

    (
        PostingId(format!("posting-{sequence:06}")),
        format!("JOB-{prefix}-{}-{sequence}", now.timestamp()),
    )
}

/// Reusable questionnaire that becomes a [`JobPosting`] once instantiated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionTemplate {
    #[serde(default, skip_deserializing)]
    pub key: String,
    #[serde(alias = "cargo")]
    pub title: String,
    #[serde(alias = "preguntas")]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub critical_skills: Vec<String>,
}

impl QuestionTemplate {
    /// Clone the template into an active posting. Repeated clones never share a public id.
    pub fn instantiate(&self, now: DateTime<Utc>) -> JobPosting {
        let (id, public_id) = allocate_posting_ids(&self.key, now);

        JobPosting {
            id,
            public_id,
            title: self.title.clone(),
            questions: self.questions.clone(),
            critical_skills: self.critical_skills.clone(),
            active: true,
            created_at: now,
        }
    }

    pub fn summary(&self) -> TemplateSummary {
        TemplateSummary {
            key: self.key.clone(),
            title: self.title.clone(),
            question_count: self.questions.len(),
            knockout_count: self
                .questions
                .iter()
                .filter(|question| question.knockout)
                .count(),
        }
    }
}

/// Listing entry for template pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateSummary {
    pub key: String,
    pub title: String,
    pub question_count: usize,
    pub knockout_count: usize,
}

/// Source of questionnaire templates, kept apart from the scoring engine.
pub trait TemplateRepository: Send + Sync {
    fn list(&self) -> Vec<TemplateSummary>;
    fn get(&self, key: &str) -> Option<QuestionTemplate>;
}

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("unable to read template library: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid template library: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("template library is empty")]
    Empty,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryTemplateRepository {
    templates: BTreeMap<String, QuestionTemplate>,
}

impl InMemoryTemplateRepository {
    pub fn new(templates: impl IntoIterator<Item = QuestionTemplate>) -> Self {
        Self {
            templates: templates
                .into_iter()
                .map(|template| (template.key.clone(), template))
                .collect(),
        }
    }

    /// Library shipped with the service: express operational filter, field
    /// sales and field technician questionnaires.
    pub fn standard() -> Self {
        Self::new([
            operational_express(),
            sales_field(),
            field_technician(),
        ])
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Read a JSON object keyed by template key.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TemplateError> {
        let raw: BTreeMap<String, QuestionTemplate> = serde_json::from_reader(reader)?;
        if raw.is_empty() {
            return Err(TemplateError::Empty);
        }

        Ok(Self::new(raw.into_iter().map(|(key, mut template)| {
            template.key = key;
            template
        })))
    }
}

impl TemplateRepository for InMemoryTemplateRepository {
    fn list(&self) -> Vec<TemplateSummary> {
        self.templates.values().map(QuestionTemplate::summary).collect()
    }

    fn get(&self, key: &str) -> Option<QuestionTemplate> {
        self.templates.get(key.trim()).cloned()
    }
}

fn closed(id: &str, text: &str, weight: f64) -> Question {
    Question::new(id, text, QuestionType::YesNo, weight).with_ideal("yes")
}

fn open(id: &str, text: &str) -> Question {
    Question::new(id, text, QuestionType::OpenText, 0.0)
}

fn operational_express() -> QuestionTemplate {
    QuestionTemplate {
        key: "operational_express".to_string(),
        title: "Express Filter (Operational)".to_string(),
        questions: vec![
            closed("q1", "Do you live in the city of the opening?", 10.0)
                .knockout()
                .with_skill("Availability"),
            closed("q2", "Are you available to travel?", 5.0).with_skill("Availability"),
            closed("q3", "Do you have experience in the role?", 15.0)
                .knockout()
                .with_category("Experience"),
            closed("q4", "Can you work the required schedule?", 10.0)
                .knockout()
                .with_skill("Availability"),
            closed("q5", "Do you accept the offered salary?", 10.0).knockout(),
            open("q6", "Briefly describe your last position"),
            closed("q7", "Are your documents up to date?", 5.0).with_short_text("Documents"),
            open("q8", "When can you start?"),
        ],
        critical_skills: Vec::new(),
    }
}

fn sales_field() -> QuestionTemplate {
    QuestionTemplate {
        key: "sales_field".to_string(),
        title: "Retail / Field Sales".to_string(),
        questions: vec![
            closed("q1", "Do you have previous sales experience?", 20.0)
                .knockout()
                .with_category("Experience")
                .with_skill("Sales"),
            closed("q2", "Do you own a vehicle?", 15.0).with_skill("Mobility"),
            open("q3", "Describe your most relevant sales achievement")
                .with_keywords(["quota", "target", "clients"]),
            closed("q4", "Are you available to travel?", 10.0).with_skill("Mobility"),
            closed("q5", "Have you met sales quotas before?", 20.0)
                .knockout()
                .with_category("Experience")
                .with_skill("Sales"),
            open("q6", "When can you start?"),
        ],
        critical_skills: vec!["Sales".to_string()],
    }
}

fn field_technician() -> QuestionTemplate {
    QuestionTemplate {
        key: "field_technician".to_string(),
        title: "Field Technician".to_string(),
        questions: vec![
            closed("q1", "Do you hold a current technical certification?", 25.0)
                .knockout()
                .with_category("Technical")
                .with_skill("Certification")
                .with_short_text("Technical certification"),
            closed("q2", "Do you own your tools?", 15.0).with_category("Technical"),
            closed("q3", "Do you hold a driving license?", 20.0)
                .knockout()
                .with_skill("Mobility"),
            open("q4", "Describe your technical experience"),
            closed("q5", "Are you available for work at heights?", 10.0)
                .with_category("Technical")
                .with_skill("Safety"),
        ],
        critical_skills: vec!["Certification".to_string()],
    }
}
