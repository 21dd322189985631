use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;

/// The answer shape a question accepts, which also selects its scoring rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum QuestionType {
    #[default]
    Text,
    Paragraph,
    MultipleChoice,
    Checkboxes,
    Dropdown,
    Date,
    Datetime,
    LinearScale,
}

impl QuestionType {
    /// Choice-like questions carry an option list with per-option scores.
    pub fn is_choice(self) -> bool {
        matches!(
            self,
            QuestionType::MultipleChoice | QuestionType::Checkboxes | QuestionType::Dropdown
        )
    }

    pub fn is_linear_scale(self) -> bool {
        self == QuestionType::LinearScale
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::Text => "text",
            QuestionType::Paragraph => "paragraph",
            QuestionType::MultipleChoice => "multiple-choice",
            QuestionType::Checkboxes => "checkboxes",
            QuestionType::Dropdown => "dropdown",
            QuestionType::Date => "date",
            QuestionType::Datetime => "datetime",
            QuestionType::LinearScale => "linear-scale",
        }
    }
}

/// A selectable answer of a choice-like question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionOption {
    pub label: String,
    #[serde(default)]
    pub score: f64,
}

/// Bounds and end labels of a linear-scale question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LinearScale {
    pub min: i32,
    pub max: i32,
    #[serde(default)]
    pub min_label: String,
    #[serde(default)]
    pub max_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Question {
    pub id: Uuid,
    pub text: String,
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<LinearScale>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

/// An option as submitted by the questionnaire editor: either a bare label
/// (scored 0) or a label with an explicit score.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OptionInput {
    Label(String),
    Scored {
        label: String,
        #[serde(default)]
        score: f64,
    },
}

/// Question fields as submitted by clients. Used both for creation and for
/// partial updates, where `None` leaves the current value in place.
///
/// Scale bounds arrive flat (`minScale`, `maxScale`, `minLabel`, `maxLabel`)
/// as the editor sends them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    pub text: Option<String>,
    pub question_type: Option<QuestionType>,
    pub options: Option<Vec<OptionInput>>,
    pub is_required: Option<bool>,
    pub min_scale: Option<i32>,
    pub max_scale: Option<i32>,
    pub min_label: Option<String>,
    pub max_label: Option<String>,
}

impl Question {
    /// Build and validate a new question from a draft.
    pub fn from_draft(draft: QuestionDraft, now: jiff::Timestamp) -> Result<Self, CoreError> {
        let mut question = Question {
            id: Uuid::new_v4(),
            text: String::new(),
            question_type: QuestionType::default(),
            options: Vec::new(),
            is_required: false,
            scale: None,
            created_at: now,
            updated_at: now,
        };
        question.apply(draft, now)?;
        Ok(question)
    }

    /// Apply the fields present in `draft`, then revalidate.
    ///
    /// Switching to a type that does not use options or scale bounds clears
    /// them unless the draft supplies them explicitly, in which case the
    /// question is rejected.
    pub fn apply(&mut self, draft: QuestionDraft, now: jiff::Timestamp) -> Result<(), CoreError> {
        let QuestionDraft {
            text,
            question_type,
            options,
            is_required,
            min_scale,
            max_scale,
            min_label,
            max_label,
        } = draft;

        if let Some(text) = text {
            self.text = text.trim().to_string();
        }
        if let Some(question_type) = question_type {
            self.question_type = question_type;
        }
        if let Some(is_required) = is_required {
            self.is_required = is_required;
        }

        match options {
            Some(options) => self.options = normalize_options(options),
            None if !self.question_type.is_choice() => self.options.clear(),
            None => {}
        }

        let touches_scale =
            min_scale.is_some() || max_scale.is_some() || min_label.is_some() || max_label.is_some();

        if self.question_type.is_linear_scale() {
            let current = self.scale.take();
            let min = min_scale
                .or(current.as_ref().map(|s| s.min))
                .ok_or_else(|| CoreError::MissingField("minScale".to_string()))?;
            let max = max_scale
                .or(current.as_ref().map(|s| s.max))
                .ok_or_else(|| CoreError::MissingField("maxScale".to_string()))?;
            let min_label = min_label
                .map(|l| l.trim().to_string())
                .or_else(|| current.as_ref().map(|s| s.min_label.clone()))
                .unwrap_or_default();
            let max_label = max_label
                .map(|l| l.trim().to_string())
                .or_else(|| current.as_ref().map(|s| s.max_label.clone()))
                .unwrap_or_default();
            self.scale = Some(LinearScale {
                min,
                max,
                min_label,
                max_label,
            });
        } else if touches_scale {
            return Err(CoreError::validation(format!(
                "scale bounds only apply to linear-scale questions, not {}",
                self.question_type.as_str()
            )));
        } else {
            self.scale = None;
        }

        self.updated_at = now;
        self.validate()
    }

    /// Check the type-dependent shape of the question.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.text.trim().is_empty() {
            return Err(CoreError::MissingField("text".to_string()));
        }

        if self.question_type.is_choice() {
            if self.options.is_empty() {
                return Err(CoreError::validation(format!(
                    "{} questions require at least one option",
                    self.question_type.as_str()
                )));
            }
            let mut seen = HashSet::new();
            for option in &self.options {
                if !seen.insert(option.label.as_str()) {
                    return Err(CoreError::validation(format!(
                        "duplicate option label: {}",
                        option.label
                    )));
                }
                if !option.score.is_finite() {
                    return Err(CoreError::validation(format!(
                        "option '{}' has a non-finite score",
                        option.label
                    )));
                }
            }
        } else if !self.options.is_empty() {
            return Err(CoreError::validation(format!(
                "{} questions do not take options",
                self.question_type.as_str()
            )));
        }

        match (&self.scale, self.question_type.is_linear_scale()) {
            (Some(scale), true) if scale.min >= scale.max => Err(CoreError::validation(format!(
                "linear scale minimum {} must be below maximum {}",
                scale.min, scale.max
            ))),
            (None, true) => Err(CoreError::MissingField("minScale".to_string())),
            (Some(_), false) => Err(CoreError::validation(
                "scale bounds only apply to linear-scale questions",
            )),
            _ => Ok(()),
        }
    }

    /// Find the option with exactly this label.
    pub fn option(&self, label: &str) -> Option<&QuestionOption> {
        self.options.iter().find(|o| o.label == label)
    }
}

/// Trim labels and drop blank entries, as the editor leaves an empty
/// trailing option row in place.
fn normalize_options(options: Vec<OptionInput>) -> Vec<QuestionOption> {
    options
        .into_iter()
        .map(|o| match o {
            OptionInput::Label(label) => QuestionOption { label, score: 0.0 },
            OptionInput::Scored { label, score } => QuestionOption { label, score },
        })
        .map(|o| QuestionOption {
            label: o.label.trim().to_string(),
            score: o.score,
        })
        .filter(|o| !o.label.is_empty())
        .collect()
}
