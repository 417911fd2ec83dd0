use std::collections::BTreeMap;

use super::super::text::{normalize_answer, truncate_display};
use super::config::EvaluationConfig;
use super::policy::RECOMMENDED_THRESHOLD;
use super::rules::QuestionOutcome;

pub(crate) const STRENGTHS_FALLBACK: &str = "evaluation completed";
pub(crate) const RISKS_REVIEW_FALLBACK: &str = "manual validation required";
pub(crate) const RISKS_CLEAR_FALLBACK: &str = "no risks identified";

pub(crate) fn collect_strengths(
    outcomes: &[QuestionOutcome<'_>],
    skill_breakdown: &BTreeMap<String, u8>,
    config: &EvaluationConfig,
) -> Vec<String> {
    let mut strengths: Vec<String> = critical_skills(skill_breakdown, config)
        .filter(|(_, pct)| *pct >= config.critical_strength_threshold)
        .map(|(skill, pct)| format!("Critical skill {skill}: {pct}%"))
        .collect();

    strengths.extend(
        outcomes
            .iter()
            .filter(|outcome| {
                outcome.question.question_type.is_scored()
                    && outcome.question.weight > 0.0
                    && outcome.passed
            })
            .map(|outcome| {
                truncate_display(outcome.question.display_text(), config.highlight_text_limit)
            }),
    );

    strengths.truncate(config.highlight_limit);
    if strengths.is_empty() {
        strengths.push(STRENGTHS_FALLBACK.to_string());
    }
    strengths
}

pub(crate) fn collect_risks(
    outcomes: &[QuestionOutcome<'_>],
    skill_breakdown: &BTreeMap<String, u8>,
    config: &EvaluationConfig,
    score: f64,
) -> Vec<String> {
    let mut risks: Vec<String> = critical_skills(skill_breakdown, config)
        .filter(|(_, pct)| *pct <= config.critical_risk_threshold)
        .map(|(skill, pct)| format!("Critical skill {skill}: {pct}%"))
        .collect();

    risks.extend(
        outcomes
            .iter()
            .filter(|outcome| {
                outcome.question.question_type.is_scored()
                    && outcome.question.weight > 0.0
                    && outcome.points == 0.0
            })
            .map(|outcome| {
                truncate_display(outcome.question.display_text(), config.highlight_text_limit)
            }),
    );

    risks.truncate(config.highlight_limit);
    if risks.is_empty() {
        let fallback = if score < RECOMMENDED_THRESHOLD {
            RISKS_REVIEW_FALLBACK
        } else {
            RISKS_CLEAR_FALLBACK
        };
        risks.push(fallback.to_string());
    }
    risks
}

/// Critical skills in configuration order, matched case- and accent-insensitively
/// against the skill breakdown. Skills without achievable weight are skipped.
fn critical_skills<'a>(
    skill_breakdown: &'a BTreeMap<String, u8>,
    config: &'a EvaluationConfig,
) -> impl Iterator<Item = (&'a str, u8)> + 'a {
    config.critical_skills.iter().filter_map(move |wanted| {
        let wanted = normalize_answer(wanted);
        skill_breakdown
            .iter()
            .find(|(skill, _)| normalize_answer(skill) == wanted)
            .map(|(skill, pct)| (skill.as_str(), *pct))
    })
}
