use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single value entered by an end user for one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Null,
}

/// Field name to submitted value
pub type SubmittedValues = BTreeMap<String, InputValue>;

impl InputValue {
    pub fn text<S: Into<String>>(text: S) -> Self {
        InputValue::Text(text.into())
    }

    /// Null or the empty string. Whitespace counts as content.
    pub fn is_blank(&self) -> bool {
        match self {
            InputValue::Null => true,
            InputValue::Text(text) => text.is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            InputValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<&str> for InputValue {
    fn from(text: &str) -> Self {
        InputValue::Text(text.to_string())
    }
}

impl From<String> for InputValue {
    fn from(text: String) -> Self {
        InputValue::Text(text)
    }
}

impl From<f64> for InputValue {
    fn from(number: f64) -> Self {
        InputValue::Number(number)
    }
}

impl From<bool> for InputValue {
    fn from(flag: bool) -> Self {
        InputValue::Bool(flag)
    }
}

impl fmt::Display for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputValue::Bool(flag) => write!(f, "{}", flag),
            InputValue::Number(number) => write!(f, "{}", number),
            InputValue::Text(text) => write!(f, "{}", text),
            InputValue::Null => Ok(()),
        }
    }
}
