//! Response validation and status parsing for the homework API.
//!
//! Expected body: `{"homeworks": [{"homework_name": "...", "status": "..."}, ...]}`.
//! Anything else is reported as a [`ShapeError`].

use std::collections::BTreeMap;

use serde_json::Value;

use crate::errors::ShapeError;

/// Immutable mapping from review status code to a human-readable verdict.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerdictTable {
    verdicts: BTreeMap<String, String>,
}

impl VerdictTable {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            verdicts: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn verdict(&self, status: &str) -> Option<&str> {
        self.verdicts.get(status).map(String::as_str)
    }

    pub fn statuses(&self) -> impl Iterator<Item = &str> {
        self.verdicts.keys().map(String::as_str)
    }
}

impl Default for VerdictTable {
    fn default() -> Self {
        Self::new([
            (
                "approved",
                "Работа проверена: ревьюеру всё понравилось. Ура!",
            ),
            ("reviewing", "Работа взята на проверку ревьюером."),
            ("rejected", "Работа проверена: у ревьюера есть замечания."),
        ])
    }
}

/// Check the top-level shape of an API response and borrow its homework list.
pub fn check_response(response: &Value) -> Result<&[Value], ShapeError> {
    let obj = response.as_object().ok_or(ShapeError::NotAMapping)?;
    let homeworks = obj.get("homeworks").ok_or(ShapeError::MissingHomeworks)?;
    homeworks
        .as_array()
        .map(Vec::as_slice)
        .ok_or(ShapeError::HomeworksNotAList)
}

/// Build the status-change sentence for a single homework record.
pub fn parse_status(homework: &Value, verdicts: &VerdictTable) -> Result<String, ShapeError> {
    let obj = homework.as_object().ok_or(ShapeError::RecordNotAMapping)?;
    let name = obj
        .get("homework_name")
        .and_then(Value::as_str)
        .ok_or(ShapeError::MissingName)?;
    let status = obj
        .get("status")
        .and_then(Value::as_str)
        .ok_or(ShapeError::MissingStatus)?;
    let verdict = verdicts
        .verdict(status)
        .ok_or_else(|| ShapeError::UnknownStatus(status.to_string()))?;

    Ok(format!(
        "Изменился статус проверки работы \"{name}\". {verdict}"
    ))
}
