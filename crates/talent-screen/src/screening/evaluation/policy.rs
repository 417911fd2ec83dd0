use serde::{Deserialize, Serialize};

pub(crate) const RECOMMENDED_THRESHOLD: f64 = 75.0;
pub(crate) const REVIEW_THRESHOLD: f64 = 40.0;
const SCHEDULE_IMMEDIATELY_THRESHOLD: f64 = 85.0;
const ADVANCE_THRESHOLD: f64 = 70.0;

/// Screening verdict shown to recruiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    DisqualifiedKo,
    Recommended,
    Review,
    NotSuitable,
}

impl Verdict {
    pub const fn label(self) -> &'static str {
        match self {
            Self::DisqualifiedKo => "DISQUALIFIED_KO",
            Self::Recommended => "RECOMMENDED",
            Self::Review => "REVIEW",
            Self::NotSuitable => "NOT_SUITABLE",
        }
    }
}

/// Next action suggested for the recruiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    DoNotProceed,
    ScheduleImmediately,
    AdvanceToNextStage,
    ManualValidationInterview,
    Reject,
}

impl Recommendation {
    pub const fn label(self) -> &'static str {
        match self {
            Self::DoNotProceed => "do not proceed",
            Self::ScheduleImmediately => "schedule immediately",
            Self::AdvanceToNextStage => "advance to next stage",
            Self::ManualValidationInterview => "manual validation interview",
            Self::Reject => "reject",
        }
    }
}

/// Percentage of the achievable weight, one decimal place, 0 when nothing is achievable.
pub(crate) fn overall_score(raw_points: f64, total_possible_weight: f64) -> f64 {
    if total_possible_weight <= 0.0 {
        return 0.0;
    }
    let pct = ((raw_points / total_possible_weight) * 100.0).clamp(0.0, 100.0);
    (pct * 10.0).round() / 10.0
}

pub(crate) fn decide_verdict(score: f64) -> Verdict {
    if score >= RECOMMENDED_THRESHOLD {
        Verdict::Recommended
    } else if score >= REVIEW_THRESHOLD {
        Verdict::Review
    } else {
        Verdict::NotSuitable
    }
}

pub(crate) fn recommend(verdict: Verdict, score: f64) -> Recommendation {
    if verdict == Verdict::DisqualifiedKo {
        Recommendation::DoNotProceed
    } else if score >= SCHEDULE_IMMEDIATELY_THRESHOLD {
        Recommendation::ScheduleImmediately
    } else if score >= ADVANCE_THRESHOLD {
        Recommendation::AdvanceToNextStage
    } else if score >= REVIEW_THRESHOLD {
        Recommendation::ManualValidationInterview
    } else {
        Recommendation::Reject
    }
}

/// Template-filled narrative for the recruiter dashboard.
pub(crate) fn summarize(
    verdict: Verdict,
    disqualification_reason: Option<&str>,
    role_title: Option<&str>,
) -> String {
    let role = match role_title.map(str::trim).filter(|title| !title.is_empty()) {
        Some(title) => format!("the {title} role"),
        None => "this position".to_string(),
    };

    match verdict {
        Verdict::DisqualifiedKo => format!(
            "Candidate automatically disqualified. Does not meet: {}. Fails a critical requirement for {}.",
            disqualification_reason.unwrap_or("knockout requirement"),
            role
        ),
        Verdict::Recommended => format!(
            "Highly qualified candidate for {role}. Meets most key requirements; a priority interview is recommended."
        ),
        Verdict::Review => format!(
            "Moderate profile for {role}. Meets basic requirements but needs additional validation by the recruiter."
        ),
        Verdict::NotSuitable => format!(
            "Candidate is below the minimum threshold for {role}. Continuing the process is not recommended."
        ),
    }
}
