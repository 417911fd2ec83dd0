use crate::screening::domain::{Answer, Question, QuestionType};

/// Three-question posting used by the end-to-end scoring scenarios.
pub(super) fn reference_questions() -> Vec<Question> {
    vec![
        Question::new("q1", "Do you live in the city?", QuestionType::YesNo, 50.0)
            .with_ideal("si")
            .knockout()
            .with_category("Fit")
            .with_skill("Availability"),
        Question::new("q2", "Do you own a vehicle?", QuestionType::YesNo, 30.0)
            .with_ideal("si")
            .with_category("Experience")
            .with_skill("Mobility"),
        Question::new("q3", "Rate your customer service", QuestionType::Scale1To5, 20.0)
            .with_category("Soft Skills")
            .with_skill("Communication"),
    ]
}

pub(super) fn answers(pairs: &[(&str, &str)]) -> Vec<Answer> {
    pairs
        .iter()
        .map(|(id, value)| Answer::new(*id, *value))
        .collect()
}

pub(super) fn technical_questions() -> Vec<Question> {
    vec![
        Question::new("t1", "Years working with SQL", QuestionType::Scale1To10, 20.0)
            .with_category("Technical")
            .with_skill("SQL"),
        Question::new("t2", "Have you tuned production queries?", QuestionType::YesNo, 20.0)
            .with_ideal("yes")
            .with_category("Technical")
            .with_skill("SQL"),
        Question::new("t3", "Preferred language", QuestionType::MultipleChoice, 30.0)
            .with_ideal("Rust")
            .with_category("Technical")
            .with_skill("Rust"),
        Question::new("t4", "Led a team before?", QuestionType::YesNo, 30.0)
            .with_ideal("yes")
            .with_category("Experience")
            .with_skill("Leadership"),
        Question::new("t5", "Describe a hard outage", QuestionType::OpenText, 0.0)
            .with_keywords(["rollback", "postmortem"])
            .with_category("Experience"),
    ]
}

pub(super) fn has_one_decimal(score: f64) -> bool {
    ((score * 10.0).round() - score * 10.0).abs() < 1e-9
}
