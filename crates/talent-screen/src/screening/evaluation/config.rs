use serde::{Deserialize, Serialize};

use super::super::domain::JobPosting;

/// Posting-level knobs for the narrative parts of an evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub role_title: Option<String>,
    pub critical_skills: Vec<String>,
    pub critical_strength_threshold: u8,
    pub critical_risk_threshold: u8,
    pub highlight_limit: usize,
    pub highlight_text_limit: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            role_title: None,
            critical_skills: Vec::new(),
            critical_strength_threshold: 80,
            critical_risk_threshold: 60,
            highlight_limit: 5,
            highlight_text_limit: 50,
        }
    }
}

impl EvaluationConfig {
    pub fn for_posting(posting: &JobPosting) -> Self {
        Self {
            role_title: Some(posting.title.clone()),
            critical_skills: posting.critical_skills.clone(),
            ..Self::default()
        }
    }
}
