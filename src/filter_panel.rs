mod condition_row;
mod config;
mod multi_select;

pub use config::FilterPanelConfig;

use dynfilter_core::{ConditionId, FilterSession, Operator, Predicate};
use egui::{Button, RichText, Ui};
use log::trace;

/// Panel for composing filter conditions over a [FilterSession].
///
/// The panel only edits the session. Filtering happens when the caller reacts to
/// [FilterPanelResponse::applied], so half edited conditions never narrow the table.
pub struct FilterPanel {
    config: FilterPanelConfig,
}

/// What the user did with the panel this frame.
#[derive(Default, Copy, Clone, Debug)]
pub struct FilterPanelResponse {
    /// "Filter" was clicked.
    pub applied: bool,
    /// "Clear filters" was clicked, the session is now empty.
    pub cleared: bool,
    /// Any condition was added, edited or removed.
    pub changed: bool,
}

/// Collected while the condition list is borrowed for drawing, applied afterwards.
#[derive(Debug)]
enum Edit {
    Column(ConditionId, String),
    Operator(ConditionId, Operator),
    Predicate(ConditionId, Predicate),
    Remove(ConditionId),
}

impl FilterPanel {
    pub fn new() -> Self {
        FilterPanel {
            config: FilterPanelConfig::default(),
        }
    }

    pub fn with_config(config: FilterPanelConfig) -> Self {
        FilterPanel { config }
    }

    pub fn show(&mut self, session: &mut FilterSession, ui: &mut Ui) -> FilterPanelResponse {
        let mut response = FilterPanelResponse::default();
        let mut edits = Vec::new();

        ui.horizontal(|ui| {
            ui.heading(self.config.title.as_str());
            if self.config.show_condition_count && !session.is_empty() {
                ui.label(RichText::new(format!("({})", session.len())).weak());
            }
        });
        ui.separator();

        match session.schema() {
            Some(schema) => {
                for condition in session.conditions() {
                    condition_row::condition_row_ui(ui, schema, condition, &self.config, &mut edits);
                }
            }
            None => {
                ui.label(RichText::new("Columns are not available yet").weak());
            }
        }

        response.changed = !edits.is_empty();
        for edit in edits {
            trace!("Filter panel edit: {edit:?}");
            match edit {
                Edit::Column(id, key) => session.change_column(&id, &key),
                Edit::Operator(id, op) => session.change_operator(&id, op),
                Edit::Predicate(id, predicate) => session.set_predicate(&id, predicate),
                Edit::Remove(id) => session.remove_condition(&id),
            }
        }

        let can_add = session.schema().is_some_and(|s| !s.is_empty());
        let add = ui
            .add_enabled(can_add, Button::new(self.config.add_label.as_str()))
            .on_disabled_hover_text("Waiting for the column list");
        if add.clicked() && session.add_condition().is_some() {
            response.changed = true;
        }

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            if ui
                .add_enabled(!session.is_empty(), Button::new(self.config.clear_label.as_str()))
                .clicked()
            {
                session.clear_all();
                response.cleared = true;
                response.changed = true;
            }
            if ui
                .add(Button::new(RichText::new(self.config.apply_label.as_str()).strong()))
                .clicked()
            {
                response.applied = true;
            }
        });

        response
    }
}

impl Default for FilterPanel {
    fn default() -> Self {
        Self::new()
    }
}
