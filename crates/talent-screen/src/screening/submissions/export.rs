//! Recruiter spreadsheet export of stored submissions.

use std::io::Write;

use serde::Serialize;

use super::domain::SubmissionRecord;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv export could not be flushed: {0}")]
    Flush(String),
    #[error("csv export produced invalid utf-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

#[derive(Serialize)]
struct ExportRow<'a> {
    submission_id: &'a str,
    candidate_name: &'a str,
    candidate_identifier: &'a str,
    submitted_at: String,
    score: String,
    verdict: &'static str,
    recommendation: &'static str,
    disqualification_reason: &'a str,
}

impl<'a> From<&'a SubmissionRecord> for ExportRow<'a> {
    fn from(record: &'a SubmissionRecord) -> Self {
        Self {
            submission_id: &record.id.0,
            candidate_name: &record.candidate.name,
            candidate_identifier: record.candidate.identifier.as_deref().unwrap_or(""),
            submitted_at: record.submitted_at.to_rfc3339(),
            score: format!("{:.1}", record.result.score),
            verdict: record.result.verdict.label(),
            recommendation: record.result.recommendation.label(),
            disqualification_reason: record
                .result
                .disqualification_reason
                .as_deref()
                .unwrap_or(""),
        }
    }
}

/// Write one header row plus one row per record, in the order given.
pub fn write_submissions_csv<W: Write>(
    writer: W,
    records: &[SubmissionRecord],
) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if records.is_empty() {
        csv_writer.write_record([
            "submission_id",
            "candidate_name",
            "candidate_identifier",
            "submitted_at",
            "score",
            "verdict",
            "recommendation",
            "disqualification_reason",
        ])?;
    }
    for record in records {
        csv_writer.serialize(ExportRow::from(record))?;
    }
    csv_writer
        .flush()
        .map_err(|err| ExportError::Flush(err.to_string()))?;
    Ok(())
}

pub fn submissions_csv(records: &[SubmissionRecord]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_submissions_csv(&mut buffer, records)?;
    Ok(String::from_utf8(buffer)?)
}
