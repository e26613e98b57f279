use super::multi_select::multi_select_ui;
use super::{Edit, FilterPanelConfig};
use dynfilter_core::{
    effective_operators, Arity, Column, Condition, Predicate, Scalar, Schema, ValueType,
};
use egui::{Color32, ComboBox, Id, RichText, TextEdit, Ui, Widget};

/// One condition: column, operator and value editors plus a remove button.
/// Changes are pushed to `edits` and applied by the panel once the frame's condition list
/// is no longer borrowed.
pub(super) fn condition_row_ui(
    ui: &mut Ui,
    schema: &Schema,
    condition: &Condition,
    config: &FilterPanelConfig,
    edits: &mut Vec<Edit>,
) {
    let id = Id::new("_dynfilter_condition").with(&condition.id);
    let column = schema.column(&condition.column_key);

    ui.horizontal(|ui| {
        let selected_text = column
            .map(|c| c.label.as_str())
            .unwrap_or(condition.column_key.as_str());
        ComboBox::from_id_salt(id.with("column"))
            .selected_text(selected_text)
            .width(config.column_width)
            .show_ui(ui, |ui| {
                for c in schema.columns() {
                    let is_current = c.key == condition.column_key;
                    if ui.selectable_label(is_current, &c.label).clicked() && !is_current {
                        edits.push(Edit::Column(condition.id.clone(), c.key.clone()));
                    }
                }
            });

        match column {
            Some(column) => {
                operator_ui(ui, id, column, condition, config, edits);
                if let Some(predicate) = value_ui(ui, id, column, &condition.predicate, config)
                {
                    edits.push(Edit::Predicate(condition.id.clone(), predicate));
                }
            }
            None => {
                ui.label(RichText::new("Unknown column").color(ui.visuals().warn_fg_color));
            }
        }

        if ui
            .button(RichText::new("🗑").color(Color32::LIGHT_RED))
            .on_hover_text("Remove filter")
            .clicked()
        {
            edits.push(Edit::Remove(condition.id.clone()));
        }
    });
}

fn operator_ui(
    ui: &mut Ui,
    id: Id,
    column: &Column,
    condition: &Condition,
    config: &FilterPanelConfig,
    edits: &mut Vec<Edit>,
) {
    let current = condition.operator();
    let selected_text = match (&condition.predicate, current) {
        (Predicate::Unrecognized(name), _) => name.as_str(),
        (_, Some(op)) => op.label(),
        (_, None) => "",
    };
    ComboBox::from_id_salt(id.with("operator"))
        .selected_text(selected_text)
        .width(config.operator_width)
        .show_ui(ui, |ui| {
            for op in effective_operators(column) {
                let is_current = current == Some(*op);
                if ui.selectable_label(is_current, op.label()).clicked() && !is_current {
                    edits.push(Edit::Operator(condition.id.clone(), *op));
                }
            }
        });
}

/// Editor matching the operand shape. Returns the new predicate when the operand changed.
fn value_ui(
    ui: &mut Ui,
    id: Id,
    column: &Column,
    predicate: &Predicate,
    config: &FilterPanelConfig,
) -> Option<Predicate> {
    let op = predicate.operator()?;
    match op.arity() {
        Arity::Scalar => {
            let value = predicate.scalar()?;
            scalar_ui(ui, id.with("value"), column, value, config.value_width)
                .map(|v| Predicate::new(op, v, vec![]))
        }
        Arity::List => {
            let values = predicate.values()?;
            let picked = if column.options.is_empty() {
                list_text_ui(ui, id.with("values"), values, config.value_width)
            } else {
                multi_select_ui(
                    ui,
                    id.with("values"),
                    column,
                    values,
                    "Select values",
                    config.value_width,
                )
            };
            picked.map(|values| Predicate::new(op, Scalar::default(), values))
        }
        Arity::Range => {
            let Predicate::Between { min, max } = predicate else {
                return None;
            };
            let half = config.value_width / 2.0;
            let empty = Scalar::default();
            let new_min = scalar_ui(ui, id.with("min"), column, min, half);
            ui.label("and");
            let new_max = scalar_ui(ui, id.with("max"), column, max.as_ref().unwrap_or(&empty), half);
            if new_min.is_none() && new_max.is_none() {
                return None;
            }
            let min = new_min.unwrap_or_else(|| min.clone());
            let max = match new_max {
                Some(v) if v.is_empty_str() => None,
                Some(v) => Some(v),
                None => max.clone(),
            };
            Some(Predicate::Between { min, max })
        }
    }
}

fn scalar_ui(ui: &mut Ui, id: Id, column: &Column, value: &Scalar, width: f32) -> Option<Scalar> {
    match column.ty {
        ValueType::Select | ValueType::MultiSelect => {
            let selected_text = column
                .option_label(value)
                .map(str::to_string)
                .unwrap_or_else(|| value.to_text());
            let mut picked = None;
            ComboBox::from_id_salt(id)
                .selected_text(if value.is_empty_str() {
                    "Select a value".to_string()
                } else {
                    selected_text
                })
                .width(width)
                .show_ui(ui, |ui| {
                    for option in &column.options {
                        let is_current = option.value.strict_eq(value);
                        if ui.selectable_label(is_current, &option.label).clicked() && !is_current {
                            picked = Some(option.value.clone());
                        }
                    }
                });
            picked
        }
        ValueType::Boolean => {
            let mut picked = None;
            let selected_text = match value {
                Scalar::Bool(true) => "Yes",
                Scalar::Bool(false) => "No",
                _ => "Select a value",
            };
            ComboBox::from_id_salt(id)
                .selected_text(selected_text)
                .width(width)
                .show_ui(ui, |ui| {
                    for (b, label) in [(true, "Yes"), (false, "No")] {
                        let is_current = value.strict_eq(&Scalar::Bool(b));
                        if ui.selectable_label(is_current, label).clicked() && !is_current {
                            picked = Some(Scalar::Bool(b));
                        }
                    }
                });
            picked
        }
        ValueType::Number => {
            let mut text = value.to_text();
            let resp = TextEdit::singleline(&mut text)
                .id(id)
                .hint_text("Enter a number")
                .desired_width(width)
                .ui(ui);
            resp.changed().then(|| number_operand(&text))
        }
        ValueType::Text | ValueType::Date => {
            let mut text = value.to_text();
            let hint = if column.ty == ValueType::Date {
                "YYYY-MM-DD"
            } else {
                "Enter a value"
            };
            let resp = TextEdit::singleline(&mut text)
                .id(id)
                .hint_text(hint)
                .desired_width(width)
                .ui(ui);
            resp.changed().then(|| Scalar::Str(text))
        }
    }
}

/// Comma separated values, for list operators on columns without options.
fn list_text_ui(ui: &mut Ui, id: Id, values: &[Scalar], width: f32) -> Option<Vec<Scalar>> {
    let mut text = values
        .iter()
        .map(Scalar::to_text)
        .collect::<Vec<_>>()
        .join(",");
    let resp = TextEdit::singleline(&mut text)
        .id(id)
        .hint_text("a,b,c")
        .desired_width(width)
        .ui(ui);
    resp.changed().then(|| split_list(&text))
}

/// Typed text becomes a number only when it reads back unchanged, so partial input such as
/// `1.` or `-` stays editable.
pub(super) fn number_operand(text: &str) -> Scalar {
    match text.parse::<f64>() {
        Ok(n) if n.is_finite() && Scalar::Number(n).to_text() == text => Scalar::Number(n),
        _ => Scalar::Str(text.to_string()),
    }
}

pub(super) fn split_list(text: &str) -> Vec<Scalar> {
    if text.is_empty() {
        return vec![];
    }
    text.split(',').map(|s| Scalar::Str(s.to_string())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_operand_keeps_partial_input() {
        assert_eq!(number_operand("15000"), Scalar::Number(15000.0));
        assert_eq!(number_operand("0.5"), Scalar::Number(0.5));
        assert_eq!(number_operand("-3"), Scalar::Number(-3.0));
        assert_eq!(number_operand("1."), Scalar::str("1."));
        assert_eq!(number_operand("-"), Scalar::str("-"));
        assert_eq!(number_operand("1e3"), Scalar::str("1e3"));
        assert_eq!(number_operand(""), Scalar::str(""));
    }

    #[test]
    fn split_list_keeps_empty_segments() {
        assert!(split_list("").is_empty());
        assert_eq!(split_list("a,b"), vec![Scalar::str("a"), Scalar::str("b")]);
        assert_eq!(split_list("a,"), vec![Scalar::str("a"), Scalar::str("")]);
    }
}
