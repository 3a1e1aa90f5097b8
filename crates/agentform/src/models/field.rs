use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// The kind of value a field collects.
///
/// Tags this crate does not know deserialize into [`FieldType::Other`] instead of failing,
/// and are validated as plain strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    #[default]
    Text,
    Textarea,
    Number,
    Url,
    Email,
    Date,
    Select,
    Multiselect,
    Other(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Number => "number",
            FieldType::Url => "url",
            FieldType::Email => "email",
            FieldType::Date => "date",
            FieldType::Select => "select",
            FieldType::Multiselect => "multiselect",
            FieldType::Other(tag) => tag,
        }
    }
}

impl From<String> for FieldType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "text" => FieldType::Text,
            "textarea" => FieldType::Textarea,
            "number" => FieldType::Number,
            "url" => FieldType::Url,
            "email" => FieldType::Email,
            "date" => FieldType::Date,
            "select" => FieldType::Select,
            "multiselect" => FieldType::Multiselect,
            _ => FieldType::Other(tag),
        }
    }
}

impl From<&str> for FieldType {
    fn from(tag: &str) -> Self {
        FieldType::from(tag.to_string())
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        field_type.as_str().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A check layered on top of a field's base type check.
///
/// Stored as `{type, value?, message?}`; see [`RawRule`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRule", into = "RawRule")]
pub enum ValidationRule {
    Required {
        message: Option<String>,
    },
    MinLength {
        value: usize,
        message: Option<String>,
    },
    MaxLength {
        value: usize,
        message: Option<String>,
    },
    Pattern {
        pattern: String,
        message: Option<String>,
    },
}

impl ValidationRule {
    pub fn required() -> Self {
        ValidationRule::Required { message: None }
    }

    pub fn min_length(value: usize) -> Self {
        ValidationRule::MinLength {
            value,
            message: None,
        }
    }

    pub fn max_length(value: usize) -> Self {
        ValidationRule::MaxLength {
            value,
            message: None,
        }
    }

    pub fn pattern<S: Into<String>>(pattern: S) -> Self {
        ValidationRule::Pattern {
            pattern: pattern.into(),
            message: None,
        }
    }

    /// Replace the message shown when this rule fails
    pub fn with_message<S: Into<String>>(mut self, text: S) -> Self {
        let text = Some(text.into());
        match &mut self {
            ValidationRule::Required { message }
            | ValidationRule::MinLength { message, .. }
            | ValidationRule::MaxLength { message, .. }
            | ValidationRule::Pattern { message, .. } => *message = text,
        }
        self
    }

    pub fn rule_type(&self) -> &'static str {
        match self {
            ValidationRule::Required { .. } => "required",
            ValidationRule::MinLength { .. } => "minLength",
            ValidationRule::MaxLength { .. } => "maxLength",
            ValidationRule::Pattern { .. } => "pattern",
        }
    }
}

/// Wire shape of a rule as written by the authoring form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRule {
    #[serde(rename = "type", alias = "ruleType")]
    pub rule_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TryFrom<RawRule> for ValidationRule {
    type Error = String;

    fn try_from(raw: RawRule) -> Result<Self, Self::Error> {
        // an empty message means "use the default"
        let message = raw.message.filter(|m| !m.is_empty());
        match raw.rule_type.as_str() {
            "required" => Ok(ValidationRule::Required { message }),
            "minLength" | "min_length" => Ok(ValidationRule::MinLength {
                value: length_value(&raw.rule_type, raw.value.as_ref())?,
                message,
            }),
            "maxLength" | "max_length" => Ok(ValidationRule::MaxLength {
                value: length_value(&raw.rule_type, raw.value.as_ref())?,
                message,
            }),
            "pattern" => match raw.value {
                Some(Value::String(pattern)) => Ok(ValidationRule::Pattern { pattern, message }),
                _ => Err("pattern rule requires a string value".to_string()),
            },
            other => Err(format!("unknown validation rule: {}", other)),
        }
    }
}

fn length_value(rule_type: &str, value: Option<&Value>) -> Result<usize, String> {
    let parsed = match value {
        Some(Value::Number(number)) => number.as_u64().and_then(|n| usize::try_from(n).ok()),
        Some(Value::String(text)) => text.trim().parse::<usize>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| format!("{} rule requires a non-negative integer value", rule_type))
}

impl From<ValidationRule> for RawRule {
    fn from(rule: ValidationRule) -> Self {
        let rule_type = rule.rule_type().to_string();
        let (value, message) = match rule {
            ValidationRule::Required { message } => (None, message),
            ValidationRule::MinLength { value, message }
            | ValidationRule::MaxLength { value, message } => (Some(Value::from(value)), message),
            ValidationRule::Pattern { pattern, message } => (Some(Value::String(pattern)), message),
        };
        RawRule {
            rule_type,
            value,
            message,
        }
    }
}

/// One choice of a select field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    /// Stored as text; authored numbers and booleans are converted
    #[serde(deserialize_with = "option_value")]
    pub value: String,
}

fn option_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "option value must be a string or number, got {}",
            other
        ))),
    }
}

impl SelectOption {
    pub fn new<L: Into<String>, V: Into<String>>(label: L, value: V) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// A required input authored by an agent owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default = "default_true", alias = "is_required")]
    pub is_required: bool,
    #[serde(default, alias = "validation_rules")]
    pub validation_rules: Vec<ValidationRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, alias = "default_value", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, alias = "order_index")]
    pub order_index: i32,
}

impl FieldDescriptor {
    /// A required field with no rules, ordered first
    pub fn new<N, L>(name: N, label: L, field_type: impl Into<FieldType>) -> Self
    where
        N: Into<String>,
        L: Into<String>,
    {
        Self {
            name: name.into(),
            label: label.into(),
            description: None,
            field_type: field_type.into(),
            is_required: true,
            validation_rules: Vec::new(),
            options: Vec::new(),
            placeholder: None,
            default_value: None,
            order_index: 0,
        }
    }

    pub fn optional(mut self) -> Self {
        self.is_required = false;
        self
    }

    pub fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.validation_rules.push(rule);
        self
    }

    pub fn with_options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    pub fn with_default<S: Into<String>>(mut self, default_value: S) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    pub fn with_placeholder<S: Into<String>>(mut self, placeholder: S) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_order(mut self, order_index: i32) -> Self {
        self.order_index = order_index;
        self
    }
}

/// Descriptors sorted by `order_index`, ties keeping their authored order
pub fn in_display_order(descriptors: &[FieldDescriptor]) -> Vec<&FieldDescriptor> {
    let mut ordered: Vec<&FieldDescriptor> = descriptors.iter().collect();
    ordered.sort_by_key(|descriptor| descriptor.order_index);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_descriptor_accepts_stored_names() {
        let descriptor: FieldDescriptor = serde_json::from_value(json!({
            "name": "youtube_url",
            "label": "YouTube URL",
            "type": "url",
            "is_required": false,
            "validation_rules": [{"type": "maxLength", "value": "200", "message": "Too long"}],
            "default_value": "https://youtube.com",
            "order_index": 2
        }))
        .unwrap();

        assert_eq!(descriptor.field_type, FieldType::Url);
        assert!(!descriptor.is_required);
        assert_eq!(descriptor.order_index, 2);
        assert_eq!(
            descriptor.default_value.as_deref(),
            Some("https://youtube.com")
        );
        assert_eq!(
            descriptor.validation_rules,
            vec![ValidationRule::max_length(200).with_message("Too long")]
        );
    }

    #[test]
    fn test_descriptor_defaults_to_required_text() {
        let descriptor: FieldDescriptor =
            serde_json::from_value(json!({"name": "topic", "label": "Topic"})).unwrap();

        assert_eq!(descriptor.field_type, FieldType::Text);
        assert!(descriptor.is_required);
        assert!(descriptor.validation_rules.is_empty());
    }

    #[test]
    fn test_unknown_field_type_is_kept() {
        let descriptor: FieldDescriptor = serde_json::from_value(json!({
            "name": "color",
            "label": "Color",
            "type": "color"
        }))
        .unwrap();

        assert_eq!(descriptor.field_type, FieldType::Other("color".to_string()));
        assert_eq!(serde_json::to_value(&descriptor).unwrap()["type"], "color");
    }

    #[test]
    fn test_rule_type_alias_and_empty_message() {
        let rule: ValidationRule =
            serde_json::from_value(json!({"ruleType": "minLength", "value": 3, "message": ""}))
                .unwrap();
        assert_eq!(rule, ValidationRule::min_length(3));
    }

    #[test]
    fn test_rule_rejects_bad_values() {
        let unknown = serde_json::from_value::<ValidationRule>(json!({"type": "between"}));
        assert!(unknown.unwrap_err().to_string().contains("unknown validation rule"));

        let negative =
            serde_json::from_value::<ValidationRule>(json!({"type": "minLength", "value": -1}));
        assert!(negative.is_err());

        let pattern = serde_json::from_value::<ValidationRule>(json!({"type": "pattern"}));
        assert!(pattern.is_err());
    }

    #[test]
    fn test_rule_serializes_to_wire_shape() {
        let rule = ValidationRule::pattern("^[A-Z]+$").with_message("Uppercase only");
        assert_eq!(
            serde_json::to_value(&rule).unwrap(),
            json!({"type": "pattern", "value": "^[A-Z]+$", "message": "Uppercase only"})
        );
    }

    #[test]
    fn test_option_values_become_text() {
        let descriptor: FieldDescriptor = serde_json::from_value(json!({
            "name": "rating",
            "label": "Rating",
            "type": "select",
            "options": [
                {"label": "Five", "value": 5},
                {"label": "Half", "value": 0.5},
                {"label": "Other", "value": "other"}
            ]
        }))
        .unwrap();

        assert_eq!(
            descriptor.options,
            vec![
                SelectOption::new("Five", "5"),
                SelectOption::new("Half", "0.5"),
                SelectOption::new("Other", "other"),
            ]
        );

        let nested = serde_json::from_value::<SelectOption>(json!({"label": "X", "value": [1]}));
        assert!(nested.is_err());
    }

    #[test]
    fn test_display_order_is_stable() {
        let fields = vec![
            FieldDescriptor::new("b", "B", "text").with_order(1),
            FieldDescriptor::new("a", "A", "text").with_order(0),
            FieldDescriptor::new("c", "C", "text").with_order(1),
        ];
        let names: Vec<&str> = in_display_order(&fields)
            .into_iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
