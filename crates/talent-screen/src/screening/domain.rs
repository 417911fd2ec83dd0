use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_CATEGORY: &str = "Fit";
pub const DEFAULT_SKILL: &str = "General";

/// Identifier wrapper for job postings held by the posting store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PostingId(pub String);

/// Identifier wrapper for stored candidate submissions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubmissionId(pub String);

/// Supported questionnaire item kinds.
///
/// Aliases keep older stored postings readable without touching the records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionType {
    #[serde(rename = "yes_no", alias = "si_no", alias = "booleana")]
    YesNo,
    #[serde(
        rename = "multiple_choice",
        alias = "multiple",
        alias = "seleccion_multiple"
    )]
    MultipleChoice,
    #[serde(rename = "open_text", alias = "abierta")]
    OpenText,
    #[serde(rename = "scale_1_5", alias = "escala_1_5")]
    Scale1To5,
    #[serde(rename = "scale_1_10", alias = "escala_1_10")]
    Scale1To10,
}

impl QuestionType {
    /// Open text answers are kept for human review and never contribute points.
    pub const fn is_scored(self) -> bool {
        !matches!(self, Self::OpenText)
    }

    pub const fn is_closed(self) -> bool {
        matches!(self, Self::YesNo | Self::MultipleChoice)
    }

    pub const fn scale_max(self) -> Option<f64> {
        match self {
            Self::Scale1To5 => Some(5.0),
            Self::Scale1To10 => Some(10.0),
            _ => None,
        }
    }
}

/// Type-dependent evaluation rule authored alongside the question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionRule {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "optional_text"
    )]
    pub ideal: Option<String>,
    #[serde(
        default,
        alias = "palabras_clave",
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "keyword_list"
    )]
    pub keywords: Vec<String>,
}

/// A single questionnaire item of a job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(deserialize_with = "scalar_text")]
    pub id: String,
    #[serde(alias = "texto")]
    pub text: String,
    #[serde(
        default,
        alias = "texto_corto",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "optional_text"
    )]
    pub short_text: Option<String>,
    #[serde(rename = "type", alias = "tipo")]
    pub question_type: QuestionType,
    #[serde(default, alias = "peso", deserialize_with = "lenient_weight")]
    pub weight: f64,
    #[serde(default)]
    pub knockout: bool,
    #[serde(default, alias = "reglas", alias = "rules")]
    pub rule: QuestionRule,
    #[serde(
        default = "default_category",
        alias = "categoria",
        deserialize_with = "category_label"
    )]
    pub category: String,
    #[serde(
        default = "default_skill",
        alias = "habilidad",
        deserialize_with = "skill_label"
    )]
    pub skill: String,
}

impl Question {
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        question_type: QuestionType,
        weight: f64,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            short_text: None,
            question_type,
            weight: sanitize_weight(weight),
            knockout: false,
            rule: QuestionRule::default(),
            category: DEFAULT_CATEGORY.to_string(),
            skill: DEFAULT_SKILL.to_string(),
        }
    }

    pub fn knockout(mut self) -> Self {
        self.knockout = true;
        self
    }

    pub fn with_ideal(mut self, ideal: impl Into<String>) -> Self {
        self.rule.ideal = Some(ideal.into());
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rule.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = label_or(category.into(), DEFAULT_CATEGORY);
        self
    }

    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skill = label_or(skill.into(), DEFAULT_SKILL);
        self
    }

    pub fn with_short_text(mut self, short_text: impl Into<String>) -> Self {
        self.short_text = Some(short_text.into());
        self
    }

    /// Label used when the question is quoted in strengths and risks.
    pub fn display_text(&self) -> &str {
        self.short_text.as_deref().unwrap_or(&self.text)
    }
}

/// Raw candidate response keyed by question identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(alias = "id", deserialize_with = "scalar_text")]
    pub question_id: String,
    #[serde(default, alias = "valor", deserialize_with = "answer_text")]
    pub value: String,
}

impl Answer {
    pub fn new(question_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            question_id: question_id.into(),
            value: value.into(),
        }
    }
}

/// Job posting record supplied by the posting store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: PostingId,
    pub public_id: String,
    pub title: String,
    pub questions: Vec<Question>,
    #[serde(default)]
    pub critical_skills: Vec<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_skill() -> String {
    DEFAULT_SKILL.to_string()
}

fn label_or(value: String, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

pub(crate) fn sanitize_weight(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        0.0
    }
}

/// Wire scalar accepted wherever stored postings or form posts disagree on types.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Number(f64),
    Flag(bool),
    Text(String),
}

impl RawScalar {
    fn into_text(self) -> String {
        match self {
            RawScalar::Number(value) => value.to_string(),
            RawScalar::Flag(value) => value.to_string(),
            RawScalar::Text(value) => value,
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            RawScalar::Number(value) => Some(*value),
            RawScalar::Text(value) => value.trim().parse::<f64>().ok(),
            RawScalar::Flag(_) => None,
        }
    }
}

fn scalar_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(RawScalar::deserialize(deserializer)?.into_text())
}

fn answer_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawScalar>::deserialize(deserializer)?;
    Ok(raw.map(RawScalar::into_text).unwrap_or_default())
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawScalar>::deserialize(deserializer)?;
    Ok(raw
        .map(RawScalar::into_text)
        .filter(|value| !value.trim().is_empty()))
}

/// Keywords arrive either as a list or as one comma-separated form field.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawKeywords {
    List(Vec<RawScalar>),
    Joined(String),
}

fn keyword_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let keywords: Vec<String> = match Option::<RawKeywords>::deserialize(deserializer)? {
        Some(RawKeywords::List(items)) => items.into_iter().map(RawScalar::into_text).collect(),
        Some(RawKeywords::Joined(joined)) => joined.split(',').map(str::to_string).collect(),
        None => Vec::new(),
    };

    Ok(keywords
        .into_iter()
        .map(|keyword| keyword.trim().to_string())
        .filter(|keyword| !keyword.is_empty())
        .collect())
}

fn lenient_weight<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawScalar>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(RawScalar::as_number)
        .map(sanitize_weight)
        .unwrap_or(0.0))
}

fn category_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(label_or(raw.unwrap_or_default(), DEFAULT_CATEGORY))
}

fn skill_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(label_or(raw.unwrap_or_default(), DEFAULT_SKILL))
}
