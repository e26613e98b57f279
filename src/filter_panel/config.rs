use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterPanelConfig {
    pub title: String,
    pub add_label: String,
    pub clear_label: String,
    pub apply_label: String,
    /// Width of the column and operator drop downs.
    pub column_width: f32,
    pub operator_width: f32,
    /// Width of a single value editor, range editors use two of them.
    pub value_width: f32,
    /// Show how many conditions are in the session next to the title.
    pub show_condition_count: bool,
}

impl Default for FilterPanelConfig {
    fn default() -> Self {
        FilterPanelConfig {
            title: "Filters".to_string(),
            add_label: "➕ Add filter".to_string(),
            clear_label: "🗑 Clear filters".to_string(),
            apply_label: "Filter".to_string(),
            column_width: 160.0,
            operator_width: 130.0,
            value_width: 180.0,
            show_condition_count: true,
        }
    }
}

impl super::FilterPanel {
    pub fn config(&self) -> &FilterPanelConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut FilterPanelConfig {
        &mut self.config
    }
}
