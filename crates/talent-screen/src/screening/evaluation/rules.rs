use super::super::domain::{Answer, Question, QuestionType};
use super::super::text::{keyword_signal, normalize_answer, KeywordSignal};

/// Per-question scoring result carried through breakdowns and highlights.
pub(crate) struct QuestionOutcome<'a> {
    pub question: &'a Question,
    pub answer: Option<&'a Answer>,
    pub points: f64,
    /// Ideal answer given (closed) or top of the scale reached (scale).
    pub passed: bool,
    pub keyword_signal: Option<KeywordSignal>,
}

pub(crate) fn score_question<'a>(
    question: &'a Question,
    answer: Option<&'a Answer>,
) -> QuestionOutcome<'a> {
    let raw = answer.map(|answer| answer.value.as_str()).unwrap_or("");

    let (points, passed, keyword_signal) = match question.question_type {
        QuestionType::YesNo | QuestionType::MultipleChoice => {
            let passed = matches_ideal(raw, question.rule.ideal.as_deref());
            let points = if passed { question.weight } else { 0.0 };
            (points, passed, None)
        }
        QuestionType::Scale1To5 | QuestionType::Scale1To10 => {
            let scale_max = question.question_type.scale_max().unwrap_or(1.0);
            match parse_scale_value(raw, scale_max) {
                Some(value) => (
                    (value * question.weight) / scale_max,
                    value >= scale_max,
                    None,
                ),
                None => (0.0, false, None),
            }
        }
        QuestionType::OpenText => (0.0, true, keyword_signal(raw, &question.rule.keywords)),
    };

    QuestionOutcome {
        question,
        answer,
        points,
        passed,
        keyword_signal,
    }
}

/// A closed question without an authored ideal answer can never be matched.
fn matches_ideal(raw: &str, ideal: Option<&str>) -> bool {
    match ideal.map(normalize_answer) {
        Some(ideal) if !ideal.is_empty() => normalize_answer(raw) == ideal,
        _ => false,
    }
}

/// Accepts `4.5` and the comma-decimal form `4,5`.
fn parse_scale_value(raw: &str, scale_max: f64) -> Option<f64> {
    let value = raw.trim().replace(',', ".").parse::<f64>().ok()?;
    if value.is_finite() {
        Some(value.clamp(0.0, scale_max))
    } else {
        None
    }
}
