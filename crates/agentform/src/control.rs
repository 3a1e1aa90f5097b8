use serde::{Deserialize, Serialize};

use crate::models::field::{FieldDescriptor, FieldType, SelectOption};

/// The UI control a field is rendered with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ControlKind {
    /// Single-line input; `input_type` is the HTML input type to use
    Input { input_type: String },
    /// Multi-line text area
    Multiline,
    /// Numeric input; entered text is converted to a number
    Numeric,
    /// Dropdown over the field's options
    Dropdown { options: Vec<SelectOption> },
    /// Nothing is rendered for this field yet
    None,
}

/// Classify a field by the control that should render it.
///
/// Multiselect has no control yet and yields [`ControlKind::None`]. Unknown types fall
/// back to a single-line input of that type.
pub fn render_control_kind(descriptor: &FieldDescriptor) -> ControlKind {
    match &descriptor.field_type {
        FieldType::Textarea => ControlKind::Multiline,
        FieldType::Number => ControlKind::Numeric,
        FieldType::Select => ControlKind::Dropdown {
            options: descriptor.options.clone(),
        },
        FieldType::Multiselect => ControlKind::None,
        other => ControlKind::Input {
            input_type: other.as_str().to_string(),
        },
    }
}
