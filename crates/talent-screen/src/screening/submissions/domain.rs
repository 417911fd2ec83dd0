use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::screening::domain::{Answer, PostingId, Question, SubmissionId};
use crate::screening::evaluation::{EvaluationResult, Recommendation, Verdict};

/// Candidate form post for a public posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSubmission {
    #[serde(alias = "nombre")]
    pub candidate_name: String,
    #[serde(default, alias = "identificacion")]
    pub candidate_identifier: Option<String>,
    #[serde(default, alias = "respuestas")]
    pub answers: Vec<Answer>,
}

/// Candidate identity as stored with the submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

/// Stored submission. `result` is written once and never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub posting_id: PostingId,
    pub posting_public_id: String,
    pub candidate: CandidateInfo,
    pub submitted_at: DateTime<Utc>,
    pub result: EvaluationResult,
}

impl SubmissionRecord {
    pub fn view(&self) -> SubmissionView {
        SubmissionView {
            submission_id: self.id.clone(),
            posting_public_id: self.posting_public_id.clone(),
            candidate_name: self.candidate.name.clone(),
            submitted_at: self.submitted_at,
            score: self.result.score,
            verdict: self.result.verdict,
            recommendation: self.result.recommendation,
            summary: self.result.summary.clone(),
            disqualification_reason: self.result.disqualification_reason.clone(),
        }
    }
}

/// Recruiter-facing row used by rankings and submission receipts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionView {
    pub submission_id: SubmissionId,
    pub posting_public_id: String,
    pub candidate_name: String,
    pub submitted_at: DateTime<Utc>,
    pub score: f64,
    pub verdict: Verdict,
    pub recommendation: Recommendation,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disqualification_reason: Option<String>,
}

/// Stored record plus the assessments and pipeline moves appended after it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionDetail {
    #[serde(flatten)]
    pub record: SubmissionRecord,
    pub assessments: Vec<InterviewAssessment>,
    /// Latest entry of `status_history`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub status_history: Vec<StatusChange>,
}

/// Recruiter pipeline move ("interview", "hired", "rejected", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub submission_id: SubmissionId,
    pub status: String,
    #[serde(default)]
    pub notes: String,
    pub changed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRequest {
    #[serde(alias = "estado")]
    pub status: String,
    #[serde(default)]
    pub notes: String,
}

/// Interview score recorded after screening, kept apart from the evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewAssessment {
    pub submission_id: SubmissionId,
    pub interviewer: String,
    pub score: u8,
    #[serde(default)]
    pub notes: String,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentRequest {
    pub interviewer: String,
    pub score: u8,
    #[serde(default)]
    pub notes: String,
}

/// Recruiter request to open a new posting with an authored questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostingDraft {
    #[serde(alias = "cargo")]
    pub title: String,
    #[serde(alias = "preguntas")]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub critical_skills: Vec<String>,
}

/// Partial edit of a posting. Absent fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostingUpdate {
    #[serde(default, alias = "cargo")]
    pub title: Option<String>,
    #[serde(default, alias = "preguntas")]
    pub questions: Option<Vec<Question>>,
    #[serde(default)]
    pub critical_skills: Option<Vec<String>>,
    #[serde(default, alias = "activa")]
    pub active: Option<bool>,
}

/// Stateless evaluation request for previews and integrations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub questions: Vec<Question>,
    #[serde(default)]
    pub answers: Vec<Answer>,
    #[serde(default)]
    pub role_title: Option<String>,
    #[serde(default)]
    pub critical_skills: Vec<String>,
}
