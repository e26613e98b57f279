use dynfilter_core::{Column, Scalar};
use egui::{ComboBox, Frame, Id, RichText, Ui};

/// Selected values as removable chips followed by a drop down with the remaining options.
/// Returns the new selection when it changed this frame.
pub(super) fn multi_select_ui(
    ui: &mut Ui,
    id: Id,
    column: &Column,
    selected: &[Scalar],
    placeholder: &str,
    width: f32,
) -> Option<Vec<Scalar>> {
    let mut removed = None;
    let mut added = None;
    ui.horizontal_wrapped(|ui| {
        ui.set_max_width(width);
        for (idx, value) in selected.iter().enumerate() {
            let label = column
                .option_label(value)
                .map(str::to_string)
                .unwrap_or_else(|| value.to_text());
            Frame::new()
                .fill(ui.visuals().selection.bg_fill.gamma_multiply(0.4))
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(6, 1))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.spacing_mut().item_spacing.x = 2.0;
                        ui.label(RichText::new(label).small());
                        if ui
                            .small_button("×")
                            .on_hover_text("Remove value")
                            .clicked()
                        {
                            removed = Some(idx);
                        }
                    });
                });
        }

        let remaining = column
            .options
            .iter()
            .filter(|o| !selected.iter().any(|v| v.same_value(&o.value)))
            .collect::<Vec<_>>();
        if remaining.is_empty() {
            return;
        }
        let text = if selected.is_empty() { placeholder } else { "…" };
        ComboBox::from_id_salt(id.with("_dynfilter_multi_select"))
            .selected_text(text)
            .width(if selected.is_empty() { width } else { 30.0 })
            .show_ui(ui, |ui| {
                for option in remaining {
                    if ui.selectable_label(false, &option.label).clicked() {
                        added = Some(option.value.clone());
                    }
                }
            });
    });

    match (removed, added) {
        (Some(idx), _) => {
            let mut values = selected.to_vec();
            values.remove(idx);
            Some(values)
        }
        (None, Some(value)) => {
            let mut values = selected.to_vec();
            values.push(value);
            Some(values)
        }
        (None, None) => None,
    }
}
