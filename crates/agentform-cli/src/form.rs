use agentform::models::field::{in_display_order, FieldDescriptor};
use agentform::models::value::{InputValue, SubmittedValues};
use agentform::schema::{FieldValidator, ValidationSchema};
use agentform::{render_control_kind, ControlKind};
use anyhow::Result;

/// Turn what was typed into a field into the value that gets validated
pub fn parse_entry(control: &ControlKind, raw: &str) -> InputValue {
    match control {
        ControlKind::Numeric if raw.trim().is_empty() => InputValue::Null,
        ControlKind::Numeric => raw
            .trim()
            .parse::<f64>()
            .map(InputValue::Number)
            .unwrap_or_else(|_| InputValue::text(raw)),
        _ => InputValue::text(raw),
    }
}

/// Prompt for every field in display order, validating each entry as it is typed
pub fn prompt_fields(
    fields: &[FieldDescriptor],
    schema: &ValidationSchema,
) -> Result<SubmittedValues> {
    let mut values = SubmittedValues::new();

    for descriptor in in_display_order(fields) {
        let control = render_control_kind(descriptor);
        let Some(validator) = schema.field(&descriptor.name).cloned() else {
            continue;
        };

        let value = match &control {
            ControlKind::None => {
                cliclack::log::warning(format!(
                    "{} ({}) cannot be filled in yet, skipping",
                    descriptor.label, descriptor.field_type
                ))?;
                continue;
            }
            ControlKind::Dropdown { options } => {
                let mut items: Vec<(String, String, String)> = Vec::new();
                if !validator.is_required() {
                    items.push((String::new(), "None".to_string(), String::new()));
                }
                items.extend(
                    options
                        .iter()
                        .map(|option| (option.value.clone(), option.label.clone(), String::new())),
                );

                let mut select = cliclack::select(prompt_label(descriptor, &validator)).items(&items);
                if let Some(default) = &descriptor.default_value {
                    select = select.initial_value(default.clone());
                }
                InputValue::text(select.interact()?)
            }
            _ => {
                let check_control = control.clone();
                let check = validator.clone();
                let mut input = cliclack::input(prompt_label(descriptor, &validator))
                    .required(false)
                    .validate(move |entry: &String| {
                        check.check(Some(&parse_entry(&check_control, entry)))
                    });
                if let Some(placeholder) = &descriptor.placeholder {
                    input = input.placeholder(placeholder);
                }
                if let Some(default) = descriptor.default_value.as_deref().filter(|d| !d.is_empty()) {
                    input = input.default_input(default);
                }
                if control == ControlKind::Multiline {
                    input = input.multiline();
                }
                let entry: String = input.interact()?;
                parse_entry(&control, &entry)
            }
        };

        values.insert(descriptor.name.clone(), value);
    }

    Ok(values)
}

fn prompt_label(descriptor: &FieldDescriptor, validator: &FieldValidator) -> String {
    let mut label = descriptor.label.clone();
    if validator.is_required() {
        label.push_str(" *");
    }
    if let Some(description) = &descriptor.description {
        label.push_str(&format!("\n{}", description));
    }
    label
}
