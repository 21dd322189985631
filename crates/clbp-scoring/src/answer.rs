use std::collections::HashSet;

use serde_json::Value;

use clbp_core::models::question::{Question, QuestionOption, QuestionType};

/// Score a single answer against its question.
///
/// - multiple-choice, dropdown: score of the option whose label matches, else 0
/// - checkboxes: sum over the distinct selected labels that match an option
/// - linear-scale: the answer coerced to a number, 0 when it is not numeric
/// - text, paragraph, date, datetime: 0
pub fn score_answer(question: &Question, answer: &Value) -> f64 {
    match question.question_type {
        QuestionType::MultipleChoice | QuestionType::Dropdown => {
            matching_option(question, answer).map_or(0.0, |option| option.score)
        }
        QuestionType::Checkboxes => {
            let mut seen = HashSet::new();
            selected(answer)
                .iter()
                .filter_map(|item| matching_option(question, item))
                .filter(|option| seen.insert(option.label.as_str()))
                .map(|option| option.score)
                .sum()
        }
        QuestionType::LinearScale => numeric_value(answer),
        QuestionType::Text
        | QuestionType::Paragraph
        | QuestionType::Date
        | QuestionType::Datetime => 0.0,
    }
}

/// Whether an answer counts as given for a required question.
pub fn is_blank(answer: &Value) -> bool {
    match answer {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.iter().all(is_blank),
        _ => false,
    }
}

/// The option an answer refers to. Strings and booleans match a label by
/// text; numbers match a label that reads as the same number, so a dropdown
/// of "1".."5" accepts both `3` and `3.0`.
fn matching_option<'q>(question: &'q Question, answer: &Value) -> Option<&'q QuestionOption> {
    match answer {
        Value::String(s) => question.option(s),
        Value::Bool(b) => question.option(&b.to_string()),
        Value::Number(n) => question.option(&n.to_string()).or_else(|| {
            let value = n.as_f64()?;
            question
                .options
                .iter()
                .find(|option| option.label.trim().parse::<f64>().ok() == Some(value))
        }),
        _ => None,
    }
}

fn selected(answer: &Value) -> &[Value] {
    match answer {
        Value::Array(items) => items,
        other => std::slice::from_ref(other),
    }
}

/// Coerce an answer to a number. Empty strings are 0; anything non-numeric
/// or non-finite is 0.
fn numeric_value(answer: &Value) -> f64 {
    let value = match answer {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                Some(0.0)
            } else {
                s.parse::<f64>().ok()
            }
        }
        _ => None,
    };

    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}
