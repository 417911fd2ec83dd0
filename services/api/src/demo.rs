use crate::infra::{in_memory_service, load_templates, read_json_file};
use chrono::Utc;
use clap::{Args, Subcommand};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use talent_screen::config::AppConfig;
use talent_screen::error::AppError;
use talent_screen::screening::submissions::{
    submissions_csv, AssessmentRequest, CandidateSubmission, PostingUpdate, StatusRequest,
};
use talent_screen::screening::{
    Answer, EvaluationConfig, EvaluationEngine, Question, QuestionType, TemplateRepository,
};

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// JSON file with a question list or a posting/template object carrying `questions`
    #[arg(long)]
    pub(crate) questions: PathBuf,
    /// JSON file with an answer list or an object mapping question ids to values
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Critical skill to highlight in strengths and risks (repeatable)
    #[arg(long = "critical-skill")]
    pub(crate) critical_skills: Vec<String>,
    /// Role title used in the summary narrative
    #[arg(long)]
    pub(crate) title: Option<String>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum TemplatesCommand {
    /// List the available questionnaire templates
    List,
    /// Print one template as JSON
    Show {
        /// Template key, e.g. field_technician
        key: String,
    },
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Template to clone for the demo posting
    #[arg(long, default_value = "field_technician")]
    pub(crate) template: String,
    /// Print the recruiter CSV export after the ranking
    #[arg(long)]
    pub(crate) csv: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum QuestionsFile {
    List(Vec<Question>),
    Posting {
        #[serde(alias = "cargo")]
        title: Option<String>,
        #[serde(alias = "preguntas")]
        questions: Vec<Question>,
        #[serde(default)]
        critical_skills: Vec<String>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AnswersFile {
    List(Vec<Answer>),
    Map(BTreeMap<String, serde_json::Value>),
}

impl AnswersFile {
    fn into_answers(self) -> Vec<Answer> {
        match self {
            AnswersFile::List(answers) => answers,
            AnswersFile::Map(values) => values
                .into_iter()
                .map(|(question_id, value)| {
                    let value = match value {
                        serde_json::Value::String(text) => text,
                        serde_json::Value::Null => String::new(),
                        other => other.to_string(),
                    };
                    Answer::new(question_id, value)
                })
                .collect(),
        }
    }
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        questions,
        answers,
        critical_skills,
        title,
    } = args;

    let (questions, file_title, mut file_skills) = match read_json_file(&questions)? {
        QuestionsFile::List(questions) => (questions, None, Vec::new()),
        QuestionsFile::Posting {
            title,
            questions,
            critical_skills,
        } => (questions, title, critical_skills),
    };
    let answers = read_json_file::<AnswersFile>(&answers)?.into_answers();

    if !critical_skills.is_empty() {
        file_skills = critical_skills;
    }
    let engine = EvaluationEngine::new(EvaluationConfig {
        role_title: title.or(file_title),
        critical_skills: file_skills,
        ..EvaluationConfig::default()
    });

    let result = engine.evaluate(&questions, &answers);
    let json = serde_json::to_string_pretty(&result)
        .map_err(|err| AppError::Input(format!("unable to render result: {err}")))?;
    println!("{json}");
    Ok(())
}

pub(crate) fn run_templates(command: TemplatesCommand) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let templates = load_templates(&config.screening)?;

    match command {
        TemplatesCommand::List => {
            println!("Questionnaire templates");
            for summary in templates.list() {
                println!(
                    "- {:<22} {} ({} questions, {} knockout)",
                    summary.key, summary.title, summary.question_count, summary.knockout_count
                );
            }
        }
        TemplatesCommand::Show { key } => {
            let template = templates
                .get(&key)
                .ok_or_else(|| AppError::Input(format!("template {key} not found")))?;
            let json = serde_json::to_string_pretty(&template)
                .map_err(|err| AppError::Input(format!("unable to render template: {err}")))?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Answer profiles used to fill the demo posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CandidateProfile {
    Strong,
    Partial,
    Knockout,
}

fn sample_answers(questions: &[Question], profile: CandidateProfile) -> Vec<Answer> {
    let failing_knockout = questions
        .iter()
        .position(|question| question.knockout && question.question_type.is_closed());
    let failing_regular = questions
        .iter()
        .position(|question| !question.knockout && question.question_type.is_scored());

    questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let fails = match profile {
                CandidateProfile::Strong => false,
                CandidateProfile::Partial => Some(index) == failing_regular,
                CandidateProfile::Knockout => Some(index) == failing_knockout,
            };
            let value = match question.question_type {
                QuestionType::OpenText => "Five years in similar roles".to_string(),
                QuestionType::Scale1To5 if fails => "2".to_string(),
                QuestionType::Scale1To10 if fails => "4".to_string(),
                QuestionType::Scale1To5 => "5".to_string(),
                QuestionType::Scale1To10 => "10".to_string(),
                _ if fails => "no".to_string(),
                _ => question.rule.ideal.clone().unwrap_or_default(),
            };
            Answer::new(question.id.clone(), value)
        })
        .collect()
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let templates = load_templates(&AppConfig::load()?.screening)?;
    let template = templates
        .get(&args.template)
        .ok_or_else(|| AppError::Input(format!("template {} not found", args.template)))?;

    let (service, notifications) = in_memory_service();
    let posting = service.create_posting(template.instantiate(Utc::now()))?;
    println!("Candidate screening demo");
    println!(
        "- Posting {} \"{}\" ({} questions)",
        posting.public_id,
        posting.title,
        posting.questions.len()
    );

    let candidates = [
        ("Valentina Rios", CandidateProfile::Strong),
        ("Andres Mejia", CandidateProfile::Partial),
        ("Camila Duarte", CandidateProfile::Knockout),
    ];

    for (name, profile) in candidates {
        let submission = CandidateSubmission {
            candidate_name: name.to_string(),
            candidate_identifier: None,
            answers: sample_answers(&posting.questions, profile),
        };
        let record = service.submit(&posting.public_id, submission)?;
        println!(
            "- {} -> {} ({:.1}) | {}",
            record.candidate.name,
            record.result.verdict.label(),
            record.result.score,
            record.result.recommendation.label()
        );
        println!("  Summary: {}", record.result.summary);
        if record.result.is_disqualified() {
            println!(
                "  Knockout: {}",
                record.result.disqualification_reason.as_deref().unwrap_or_default()
            );
            continue;
        }
        println!("  Strengths: {}", record.result.strengths.join("; "));
        println!("  Risks: {}", record.result.risks.join("; "));
        for detail in &record.result.detail {
            if let Some(signal) = &detail.keyword_signal {
                println!(
                    "  Keywords on {}: {:.0}% covered",
                    detail.question_id,
                    signal.coverage() * 100.0
                );
            }
        }
    }

    let ranking = service.ranking(&posting.public_id)?;
    println!("\nRanking");
    for (position, record) in ranking.iter().enumerate() {
        println!(
            "  {}. {} ({:.1})",
            position + 1,
            record.candidate.name,
            record.result.score
        );
    }

    if let Some(top) = ranking.first() {
        let assessment = service.record_assessment(
            &top.id,
            AssessmentRequest {
                interviewer: "Hiring manager".to_string(),
                score: 88,
                notes: "Confirmed certification in interview".to_string(),
            },
        )?;
        println!(
            "\nInterview assessment stored for {}: {} by {}",
            top.candidate.name, assessment.score, assessment.interviewer
        );

        let change = service.update_status(
            &top.id,
            StatusRequest {
                status: "interview".to_string(),
                notes: String::new(),
            },
        )?;
        println!("Pipeline status for {}: {}", top.candidate.name, change.status);
    }

    let closed = service.update_posting(
        &posting.public_id,
        PostingUpdate {
            active: Some(false),
            ..PostingUpdate::default()
        },
    )?;
    println!(
        "Posting {} {}",
        closed.public_id,
        if closed.active { "open" } else { "closed" }
    );

    let events = notifications.events();
    if events.is_empty() {
        println!("Recruiter notifications: none dispatched");
    } else {
        println!("Recruiter notifications:");
        for event in events {
            println!("  - template={} -> {}", event.template, event.submission_id.0);
        }
    }

    if args.csv {
        println!("\n{}", submissions_csv(&ranking)?);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use talent_screen::screening::{evaluate, InMemoryTemplateRepository, Verdict};

    fn technician_questions() -> Vec<Question> {
        InMemoryTemplateRepository::standard()
            .get("field_technician")
            .expect("preset exists")
            .questions
    }

    #[test]
    fn sample_profiles_cover_each_verdict_band() {
        let questions = technician_questions();

        let strong = evaluate(&questions, &sample_answers(&questions, CandidateProfile::Strong));
        assert_eq!(strong.verdict, Verdict::Recommended);
        assert_eq!(strong.score, 100.0);

        let partial = evaluate(&questions, &sample_answers(&questions, CandidateProfile::Partial));
        assert!(partial.score < 100.0);
        assert!(partial.disqualification_reason.is_none());

        let knocked_out =
            evaluate(&questions, &sample_answers(&questions, CandidateProfile::Knockout));
        assert_eq!(knocked_out.verdict, Verdict::DisqualifiedKo);
    }

    #[test]
    fn answer_maps_are_normalised_to_text() {
        let file: AnswersFile =
            serde_json::from_str(r#"{"q1": "si", "q2": 4, "q3": true, "q4": null}"#)
                .expect("map parses");
        let answers = file.into_answers();

        let values: Vec<(&str, &str)> = answers
            .iter()
            .map(|answer| (answer.question_id.as_str(), answer.value.as_str()))
            .collect();
        assert_eq!(
            values,
            vec![("q1", "si"), ("q2", "4"), ("q3", "true"), ("q4", "")]
        );
    }

    #[test]
    fn questions_file_accepts_lists_and_postings() {
        let list: QuestionsFile = serde_json::from_str(
            r#"[{"id": "q1", "text": "Night shift?", "type": "yes_no", "weight": 10}]"#,
        )
        .expect("list parses");
        assert!(matches!(list, QuestionsFile::List(ref questions) if questions.len() == 1));

        let posting: QuestionsFile = serde_json::from_str(
            r#"{"cargo": "Bodega", "preguntas": [
                {"id": "q1", "texto": "¿Turno noche?", "tipo": "si_no", "peso": 10}
            ]}"#,
        )
        .expect("posting parses");
        match posting {
            QuestionsFile::Posting { title, questions, .. } => {
                assert_eq!(title.as_deref(), Some("Bodega"));
                assert_eq!(questions[0].weight, 10.0);
            }
            QuestionsFile::List(_) => panic!("expected posting shape"),
        }
    }
}
