use std::collections::HashMap;

use serde_json::Value;
use uuid::Uuid;

use clbp_core::models::assessment::Assessment;
use clbp_core::models::patient::Patient;
use clbp_core::models::question::Question;
use clbp_core::models::questionnaire::Questionnaire;

use crate::error::ExportError;

pub const HEADER: [&str; 13] = [
    "assessment_id",
    "patient_id",
    "patient_name",
    "questionnaire_id",
    "questionnaire_title",
    "status",
    "risk_score",
    "created_at",
    "completed_at",
    "question_id",
    "question_text",
    "answer",
    "score",
];

/// Documents referenced by the exported assessments, keyed by id.
/// Missing entries export as empty cells.
#[derive(Debug, Default)]
pub struct ExportLookup {
    pub patients: HashMap<Uuid, Patient>,
    pub questionnaires: HashMap<Uuid, Questionnaire>,
    pub questions: HashMap<Uuid, Question>,
}

/// Render assessments as CSV, one row per response.
///
/// An assessment without responses still gets one row, with the response
/// columns left empty.
pub fn assessments_csv(
    assessments: &[Assessment],
    lookup: &ExportLookup,
) -> Result<String, ExportError> {
    let mut out = String::new();
    write_record(&mut out, &HEADER);

    let mut rows = 0usize;
    for assessment in assessments {
        let patient_name = lookup
            .patients
            .get(&assessment.patient_id)
            .map(|p| p.full_name())
            .unwrap_or_default();
        let questionnaire_title = lookup
            .questionnaires
            .get(&assessment.questionnaire_id)
            .map(|q| q.title.clone())
            .unwrap_or_default();

        let leading = [
            assessment.id.to_string(),
            assessment.patient_id.to_string(),
            patient_name,
            assessment.questionnaire_id.to_string(),
            questionnaire_title,
            assessment.status.as_str().to_string(),
            format_number(assessment.risk_score),
            assessment.created_at.to_string(),
            assessment
                .completed_at
                .map(|t| t.to_string())
                .unwrap_or_default(),
        ];

        if assessment.responses.is_empty() {
            let mut record: Vec<String> = leading.to_vec();
            record.extend(std::iter::repeat_n(String::new(), 4));
            write_record(&mut out, &record);
            rows += 1;
            continue;
        }

        for response in &assessment.responses {
            let question_text = lookup
                .questions
                .get(&response.question_id)
                .map(|q| q.text.clone())
                .unwrap_or_default();

            let mut record: Vec<String> = leading.to_vec();
            record.push(response.question_id.to_string());
            record.push(question_text);
            record.push(format_answer(&response.answer)?);
            record.push(format_number(response.score));
            write_record(&mut out, &record);
            rows += 1;
        }
    }

    tracing::debug!(assessments = assessments.len(), rows, "rendered assessment csv");
    Ok(out)
}

/// Strings export as-is, lists of strings joined with "; ", null as empty,
/// anything else as compact JSON.
fn format_answer(answer: &Value) -> Result<String, ExportError> {
    match answer {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Array(items) if items.iter().all(Value::is_string) => Ok(items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join("; ")),
        other => Ok(serde_json::to_string(other)?),
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn write_record<S: AsRef<str>>(out: &mut String, fields: &[S]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape(field.as_ref()));
    }
    out.push_str("\r\n");
}

/// Quote a field when it contains a delimiter, quote, or line break.
fn escape(field: &str) -> std::borrow::Cow<'_, str> {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\"")).into()
    } else {
        field.into()
    }
}
