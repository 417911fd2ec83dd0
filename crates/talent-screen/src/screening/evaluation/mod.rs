//! Candidate scoring engine.
//!
//! Evaluation is a pure function of the question list, the candidate answers and the
//! [`EvaluationConfig`]: no clock, no I/O and no shared state, so identical inputs always
//! produce identical results and callers may run it concurrently for different candidates.

mod breakdown;
mod config;
mod highlights;
mod policy;
mod rules;

#[cfg(test)]
mod tests;

pub use config::EvaluationConfig;
pub use policy::{Recommendation, Verdict};

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{Answer, Question, QuestionType};
use super::text::KeywordSignal;
use breakdown::BreakdownAccumulator;
use highlights::{collect_risks, collect_strengths, STRENGTHS_FALLBACK};
use policy::{decide_verdict, overall_score, recommend, summarize};
use rules::{score_question, QuestionOutcome};

/// Evaluate with the default configuration (no role title, no critical skills).
pub fn evaluate(questions: &[Question], answers: &[Answer]) -> EvaluationResult {
    EvaluationEngine::default().evaluate(questions, answers)
}

/// Stateless evaluator applying an [`EvaluationConfig`] to answer sets.
#[derive(Debug, Clone, Default)]
pub struct EvaluationEngine {
    config: EvaluationConfig,
}

impl EvaluationEngine {
    pub fn new(config: EvaluationConfig) -> Self {
        Self { config }
    }

    pub fn evaluate(&self, questions: &[Question], answers: &[Answer]) -> EvaluationResult {
        let total_possible_weight: f64 = questions
            .iter()
            .filter(|question| question.question_type.is_scored())
            .map(|question| question.weight)
            .sum();

        let mut raw_points = 0.0;
        let mut breakdown = BreakdownAccumulator::default();
        let mut outcomes = Vec::with_capacity(questions.len());
        let mut seen_ids = HashSet::new();

        for question in questions {
            // Answers bind to the first question carrying an id; later duplicates stay unanswered.
            let answer = if seen_ids.insert(question.id.as_str()) {
                answers
                    .iter()
                    .find(|answer| answer.question_id == question.id)
            } else {
                None
            };

            let outcome = score_question(question, answer);

            if question.knockout && question.question_type.is_scored() && !outcome.passed {
                debug!(question_id = %question.id, "knockout question failed");
                outcomes.push(outcome);
                return self.disqualified(question, &outcomes);
            }

            if question.question_type.is_scored() {
                raw_points += outcome.points;
                breakdown.record(
                    &question.category,
                    &question.skill,
                    outcome.points,
                    question.weight,
                );
            }
            outcomes.push(outcome);
        }

        let score = overall_score(raw_points, total_possible_weight);
        let verdict = decide_verdict(score);
        let category_breakdown = breakdown.category_percentages();
        let skill_breakdown = breakdown.skill_percentages();

        debug!(
            score,
            verdict = verdict.label(),
            questions = questions.len(),
            "candidate evaluated"
        );

        EvaluationResult {
            score,
            verdict,
            disqualification_reason: None,
            strengths: collect_strengths(&outcomes, &skill_breakdown, &self.config),
            risks: collect_risks(&outcomes, &skill_breakdown, &self.config, score),
            category_breakdown,
            skill_breakdown,
            recommendation: recommend(verdict, score),
            summary: summarize(verdict, None, self.config.role_title.as_deref()),
            detail: answered_detail(&outcomes),
        }
    }

    fn disqualified(
        &self,
        question: &Question,
        outcomes: &[QuestionOutcome<'_>],
    ) -> EvaluationResult {
        let verdict = Verdict::DisqualifiedKo;
        let reason = question.text.clone();

        EvaluationResult {
            score: 0.0,
            verdict,
            summary: summarize(
                verdict,
                Some(reason.as_str()),
                self.config.role_title.as_deref(),
            ),
            risks: vec![reason.clone()],
            disqualification_reason: Some(reason),
            category_breakdown: BTreeMap::new(),
            skill_breakdown: BTreeMap::new(),
            strengths: vec![STRENGTHS_FALLBACK.to_string()],
            recommendation: recommend(verdict, 0.0),
            detail: answered_detail(outcomes),
        }
    }
}

fn answered_detail(outcomes: &[QuestionOutcome<'_>]) -> Vec<QuestionDetail> {
    outcomes
        .iter()
        .filter_map(|outcome| {
            outcome.answer.map(|answer| QuestionDetail {
                question_id: outcome.question.id.clone(),
                question_text: outcome.question.text.clone(),
                answer: answer.value.clone(),
                points_earned: outcome.points,
                weight: outcome.question.weight,
                question_type: outcome.question.question_type,
                category: outcome.question.category.clone(),
                skill: outcome.question.skill.clone(),
                keyword_signal: outcome.keyword_signal.clone(),
            })
        })
        .collect()
}

/// Audit record of one answered question, stored with the result and never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionDetail {
    pub question_id: String,
    pub question_text: String,
    pub answer: String,
    pub points_earned: f64,
    pub weight: f64,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub category: String,
    pub skill: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword_signal: Option<KeywordSignal>,
}

/// Immutable evaluation output persisted verbatim by the submission handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub score: f64,
    pub verdict: Verdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disqualification_reason: Option<String>,
    pub category_breakdown: BTreeMap<String, u8>,
    pub skill_breakdown: BTreeMap<String, u8>,
    pub strengths: Vec<String>,
    pub risks: Vec<String>,
    pub recommendation: Recommendation,
    pub summary: String,
    pub detail: Vec<QuestionDetail>,
}

impl EvaluationResult {
    pub fn is_disqualified(&self) -> bool {
        self.verdict == Verdict::DisqualifiedKo
    }
}
