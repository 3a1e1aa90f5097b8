//! Compiles authored field descriptors into a validator for end-user submissions.
//!
//! A compiled field checks presence first, then the base check picked from its
//! [`FieldType`], then the authored rules in order. The first failure wins, so each
//! field reports at most one message.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use url::Url;

use crate::errors::{SchemaError, SchemaResult};
use crate::models::field::{in_display_order, FieldDescriptor, FieldType, ValidationRule};
use crate::models::value::{InputValue, SubmittedValues};

pub const REQUIRED_MESSAGE: &str = "This field is required";

lazy_static! {
    static ref EMAIL: Regex =
        Regex::new(r"^[A-Za-z0-9._%+'-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$")
            .expect("email pattern is valid");
}

/// Outcome of validating one submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    /// One message per failing field
    pub errors: BTreeMap<String, String>,
}

impl ValidationResult {
    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BaseCheck {
    Text,
    Number,
    Url,
    Email,
    Date,
}

impl BaseCheck {
    fn for_type(field_type: &FieldType) -> Self {
        match field_type {
            FieldType::Number => BaseCheck::Number,
            FieldType::Url => BaseCheck::Url,
            FieldType::Email => BaseCheck::Email,
            FieldType::Date => BaseCheck::Date,
            FieldType::Text
            | FieldType::Textarea
            | FieldType::Select
            | FieldType::Multiselect => BaseCheck::Text,
            FieldType::Other(tag) => {
                tracing::debug!("unknown field type '{}', validating as text", tag);
                BaseCheck::Text
            }
        }
    }

    fn is_textual(self) -> bool {
        self != BaseCheck::Number
    }

    fn check(self, value: &InputValue) -> Result<(), String> {
        if self == BaseCheck::Number {
            return match value {
                InputValue::Number(number) if number.is_finite() => Ok(()),
                InputValue::Text(text) if parse_number(text).is_some() => Ok(()),
                _ => Err("Expected a number".to_string()),
            };
        }

        let text = value.as_text().ok_or_else(|| "Expected text".to_string())?;
        let accepted = match self {
            BaseCheck::Text | BaseCheck::Number => true,
            BaseCheck::Url => Url::parse(text).is_ok(),
            BaseCheck::Email => EMAIL.is_match(text),
            BaseCheck::Date => is_iso_date(text),
        };
        if accepted {
            Ok(())
        } else {
            Err(match self {
                BaseCheck::Url => "Invalid url",
                BaseCheck::Email => "Invalid email",
                _ => "Invalid date",
            }
            .to_string())
        }
    }
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn is_iso_date(text: &str) -> bool {
    DateTime::parse_from_rfc3339(text).is_ok()
        || NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
        || NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M").is_ok()
}

#[derive(Debug, Clone)]
enum Check {
    MinLength(usize, String),
    MaxLength(usize, String),
    Pattern(Regex, String),
}

impl Check {
    fn check(&self, base: BaseCheck, value: &InputValue) -> Result<(), String> {
        match self {
            // length bounds only mean something for strings
            Check::MinLength(min, message) if base.is_textual() => {
                let length = value.as_text().map_or(0, |text| text.chars().count());
                if length < *min {
                    return Err(message.clone());
                }
            }
            Check::MaxLength(max, message) if base.is_textual() => {
                let length = value.as_text().map_or(0, |text| text.chars().count());
                if length > *max {
                    return Err(message.clone());
                }
            }
            Check::Pattern(regex, message) => {
                let subject = match (base, value) {
                    (BaseCheck::Number, InputValue::Text(text)) => {
                        parse_number(text).map_or_else(|| text.clone(), |number| number.to_string())
                    }
                    _ => value.to_string(),
                };
                if !regex.is_match(&subject) {
                    return Err(message.clone());
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// Compiled checks for one field
#[derive(Debug, Clone)]
pub struct FieldValidator {
    name: String,
    presence: Option<String>,
    base: BaseCheck,
    checks: Vec<Check>,
}

impl FieldValidator {
    fn compile(descriptor: &FieldDescriptor) -> SchemaResult<Self> {
        let mut presence = descriptor
            .is_required
            .then(|| REQUIRED_MESSAGE.to_string());
        let mut checks = Vec::new();

        for rule in &descriptor.validation_rules {
            match rule {
                ValidationRule::Required { message } => {
                    presence = Some(message.clone().unwrap_or_else(|| REQUIRED_MESSAGE.to_string()));
                }
                ValidationRule::MinLength { value, message } => checks.push(Check::MinLength(
                    *value,
                    message
                        .clone()
                        .unwrap_or_else(|| format!("Must contain at least {} character(s)", value)),
                )),
                ValidationRule::MaxLength { value, message } => checks.push(Check::MaxLength(
                    *value,
                    message
                        .clone()
                        .unwrap_or_else(|| format!("Must contain at most {} character(s)", value)),
                )),
                ValidationRule::Pattern { pattern, message } => {
                    let regex = Regex::new(pattern).map_err(|source| SchemaError::InvalidPattern {
                        field: descriptor.name.clone(),
                        source,
                    })?;
                    checks.push(Check::Pattern(
                        regex,
                        message.clone().unwrap_or_else(|| "Invalid format".to_string()),
                    ));
                }
            }
        }

        Ok(Self {
            name: descriptor.name.clone(),
            presence,
            base: BaseCheck::for_type(&descriptor.field_type),
            checks,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_required(&self) -> bool {
        self.presence.is_some()
    }

    /// Check one value; `None` means the field was not submitted
    pub fn check(&self, value: Option<&InputValue>) -> Result<(), String> {
        let value = match value {
            Some(value) if !value.is_blank() => value,
            _ => {
                return match &self.presence {
                    Some(message) => Err(message.clone()),
                    None => Ok(()),
                }
            }
        };

        self.base.check(value)?;
        for check in &self.checks {
            check.check(self.base, value)?;
        }
        Ok(())
    }
}

/// Per-field validators in display order. Immutable once compiled.
#[derive(Debug, Clone, Default)]
pub struct ValidationSchema {
    fields: Vec<FieldValidator>,
}

impl ValidationSchema {
    /// Validate a whole submission. Values for unknown fields are ignored.
    pub fn validate(&self, values: &SubmittedValues) -> ValidationResult {
        let errors: BTreeMap<String, String> = self
            .fields
            .iter()
            .filter_map(|field| {
                field
                    .check(values.get(&field.name))
                    .err()
                    .map(|message| (field.name.clone(), message))
            })
            .collect();

        ValidationResult {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Validate a single field, as an interactive form does on each keystroke
    pub fn validate_field(&self, name: &str, value: &InputValue) -> Result<(), String> {
        match self.field(name) {
            Some(field) => field.check(Some(value)),
            None => Ok(()),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldValidator> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn fields(&self) -> &[FieldValidator] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Build a [`ValidationSchema`] from an agent's required inputs.
///
/// Fails on an empty or duplicated field name and on a pattern that is not a valid
/// regular expression. Unknown field types are validated as plain strings.
pub fn compile(descriptors: &[FieldDescriptor]) -> SchemaResult<ValidationSchema> {
    let mut seen = HashSet::new();
    let mut fields = Vec::with_capacity(descriptors.len());

    for descriptor in in_display_order(descriptors) {
        if descriptor.name.is_empty() {
            return Err(SchemaError::EmptyName);
        }
        if !seen.insert(descriptor.name.as_str()) {
            return Err(SchemaError::DuplicateField(descriptor.name.clone()));
        }
        fields.push(FieldValidator::compile(descriptor)?);
    }

    tracing::debug!("compiled validation schema with {} fields", fields.len());
    Ok(ValidationSchema { fields })
}

/// Initial value for every field: its authored default, or the empty string
pub fn defaults(descriptors: &[FieldDescriptor]) -> SubmittedValues {
    descriptors
        .iter()
        .map(|descriptor| {
            (
                descriptor.name.clone(),
                InputValue::text(descriptor.default_value.clone().unwrap_or_default()),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, InputValue)]) -> SubmittedValues {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_empty_schema_accepts_anything() {
        let schema = compile(&[]).unwrap();
        assert!(schema.is_empty());
        assert!(schema.validate(&SubmittedValues::new()).valid);
        assert!(schema.validate(&values(&[("extra", "x".into())])).valid);
    }

    #[test]
    fn test_required_comes_before_base_check() {
        let schema = compile(&[FieldDescriptor::new("site", "Site", "url")]).unwrap();

        let missing = schema.validate(&SubmittedValues::new());
        assert_eq!(missing.error_for("site"), Some(REQUIRED_MESSAGE));

        let null = schema.validate(&values(&[("site", InputValue::Null)]));
        assert_eq!(null.error_for("site"), Some(REQUIRED_MESSAGE));
    }

    #[test]
    fn test_optional_blank_skips_checks() {
        let schema = compile(&[FieldDescriptor::new("site", "Site", "url")
            .optional()
            .with_rule(ValidationRule::min_length(10))])
        .unwrap();

        assert!(schema.validate(&values(&[("site", "".into())])).valid);
        assert!(schema.validate(&SubmittedValues::new()).valid);
        assert_eq!(
            schema
                .validate(&values(&[("site", "nope".into())]))
                .error_for("site"),
            Some("Invalid url")
        );
    }

    #[test]
    fn test_required_rule_message_overrides_default() {
        let schema = compile(&[FieldDescriptor::new("topic", "Topic", "text")
            .optional()
            .with_rule(ValidationRule::required().with_message("Pick a topic"))])
        .unwrap();

        assert!(schema.field("topic").unwrap().is_required());
        assert_eq!(
            schema.validate(&SubmittedValues::new()).error_for("topic"),
            Some("Pick a topic")
        );
    }

    #[test]
    fn test_number_base_check() {
        let schema = compile(&[FieldDescriptor::new("count", "Count", "number")]).unwrap();

        assert!(schema.validate_field("count", &InputValue::Number(3.0)).is_ok());
        assert!(schema.validate_field("count", &"42.5".into()).is_ok());
        assert_eq!(
            schema.validate_field("count", &"many".into()),
            Err("Expected a number".to_string())
        );
        assert_eq!(
            schema.validate_field("count", &InputValue::Bool(true)),
            Err("Expected a number".to_string())
        );
    }

    #[test]
    fn test_text_rejects_non_strings() {
        let schema = compile(&[FieldDescriptor::new("topic", "Topic", "text")]).unwrap();
        assert_eq!(
            schema.validate_field("topic", &InputValue::Number(1.0)),
            Err("Expected text".to_string())
        );
    }

    #[test]
    fn test_date_formats() {
        let schema = compile(&[FieldDescriptor::new("when", "When", "date")]).unwrap();

        for accepted in [
            "2024-05-01",
            "2024-05-01T10:30",
            "2024-05-01T10:30:00",
            "2024-05-01T10:30:00Z",
            "2024-05-01T10:30:00.123+02:00",
        ] {
            assert!(schema.validate_field("when", &accepted.into()).is_ok(), "{}", accepted);
        }
        for rejected in ["yesterday", "2024-13-01", "01/05/2024"] {
            assert_eq!(
                schema.validate_field("when", &rejected.into()),
                Err("Invalid date".to_string()),
                "{}",
                rejected
            );
        }
    }

    #[test]
    fn test_email_check() {
        let schema = compile(&[FieldDescriptor::new("mail", "Mail", "email")]).unwrap();
        assert!(schema.validate_field("mail", &"someone@example.com".into()).is_ok());
        assert!(schema.validate_field("mail", &"first.last+tag@mail.co.uk".into()).is_ok());
        assert!(schema.validate_field("mail", &"someone@example".into()).is_err());
        assert!(schema.validate_field("mail", &"@example.com".into()).is_err());
    }

    #[test]
    fn test_length_bounds_count_characters() {
        let schema = compile(&[FieldDescriptor::new("name", "Name", "text")
            .with_rule(ValidationRule::min_length(2))
            .with_rule(ValidationRule::max_length(4).with_message("Keep it short"))])
        .unwrap();

        assert_eq!(
            schema.validate_field("name", &"a".into()),
            Err("Must contain at least 2 character(s)".to_string())
        );
        assert!(schema.validate_field("name", &"żółw".into()).is_ok());
        assert_eq!(
            schema.validate_field("name", &"abcde".into()),
            Err("Keep it short".to_string())
        );
    }

    #[test]
    fn test_first_failing_rule_wins() {
        let schema = compile(&[FieldDescriptor::new("code", "Code", "text")
            .with_rule(ValidationRule::pattern("^[0-9]+$").with_message("Digits only"))
            .with_rule(ValidationRule::min_length(5).with_message("Too short"))])
        .unwrap();

        assert_eq!(
            schema.validate_field("code", &"ab".into()),
            Err("Digits only".to_string())
        );
        assert_eq!(
            schema.validate_field("code", &"12".into()),
            Err("Too short".to_string())
        );
    }

    #[test]
    fn test_pattern_on_number_uses_its_text() {
        let schema = compile(&[FieldDescriptor::new("year", "Year", "number")
            .with_rule(ValidationRule::pattern("^20[0-9]{2}$"))])
        .unwrap();

        assert!(schema.validate_field("year", &InputValue::Number(2024.0)).is_ok());
        assert_eq!(
            schema.validate_field("year", &InputValue::Number(1999.0)),
            Err("Invalid format".to_string())
        );

        // numeric strings are matched in their parsed form
        assert!(schema.validate_field("year", &" 2024 ".into()).is_ok());
        assert!(schema.validate_field("year", &"2024.0".into()).is_ok());
        assert_eq!(
            schema.validate_field("year", &" 1999".into()),
            Err("Invalid format".to_string())
        );
    }

    #[test]
    fn test_invalid_pattern_names_field() {
        let err = compile(&[FieldDescriptor::new("slug", "Slug", "text")
            .with_rule(ValidationRule::pattern("([a-z"))])
        .unwrap_err();

        assert!(matches!(err, SchemaError::InvalidPattern { .. }));
        assert_eq!(err.field(), Some("slug"));
        assert!(err.to_string().contains("slug"));
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = compile(&[FieldDescriptor::new("", "Nameless", "text")]).unwrap_err();
        assert!(matches!(err, SchemaError::EmptyName));
    }

    #[test]
    fn test_fields_follow_order_index() {
        let schema = compile(&[
            FieldDescriptor::new("second", "Second", "text").with_order(2),
            FieldDescriptor::new("first", "First", "text").with_order(1),
        ])
        .unwrap();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_defaults_cover_every_field() {
        let fields = vec![
            FieldDescriptor::new("topic", "Topic", "text").with_default("rust"),
            FieldDescriptor::new("notes", "Notes", "textarea"),
        ];
        let defaults = defaults(&fields);
        assert_eq!(defaults.len(), 2);
        assert_eq!(defaults["topic"], InputValue::text("rust"));
        assert_eq!(defaults["notes"], InputValue::text(""));
    }
}
