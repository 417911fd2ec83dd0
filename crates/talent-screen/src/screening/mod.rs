//! Candidate screening: questionnaire model, scoring engine, templates and submissions.

pub mod domain;
pub mod evaluation;
pub mod submissions;
pub mod templates;
pub mod text;

pub use domain::{
    Answer, JobPosting, PostingId, Question, QuestionRule, QuestionType, SubmissionId,
};
pub use evaluation::{
    evaluate, EvaluationConfig, EvaluationEngine, EvaluationResult, QuestionDetail,
    Recommendation, Verdict,
};
pub use templates::{
    InMemoryTemplateRepository, QuestionTemplate, TemplateError, TemplateRepository,
    TemplateSummary,
};
