use crate::util::{cell_text, CellFormat};
use dynfilter_core::{Row, Schema};
use egui::{Align, Label, Layout, Response, RichText, Ui, Widget};
use egui_extras::{Column as TableColumnConfig, TableBuilder};
use serde::{Deserialize, Serialize};
use tap::Tap;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DataTableConfig {
    pub row_height: f32,
    pub striped: bool,
    /// Digits after the decimal point for number cells, `None` prints numbers as they are.
    pub number_precision: Option<usize>,
    /// chrono format string for date cells, `None` prints the stored ISO text.
    pub date_format: Option<String>,
    /// Row field shown as a leading `#id` column when the schema does not declare it.
    pub id_field: Option<String>,
    pub show_count: bool,
}

impl Default for DataTableConfig {
    fn default() -> Self {
        DataTableConfig {
            row_height: 22.0,
            striped: true,
            number_precision: Some(2),
            date_format: Some("%d/%m/%Y".to_string()),
            id_field: Some("id".to_string()),
            show_count: true,
        }
    }
}

/// Read only view of the filtered rows, one table column per schema column.
pub struct DataTable {
    config: DataTableConfig,
}

impl DataTable {
    pub fn new() -> Self {
        DataTable {
            config: DataTableConfig::default(),
        }
    }

    pub fn with_config(config: DataTableConfig) -> Self {
        DataTable { config }
    }

    pub fn config(&self) -> &DataTableConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut DataTableConfig {
        &mut self.config
    }

    /// Show `rows[visible[..]]`. Loading, empty and populated states are mutually exclusive,
    /// loading wins.
    pub fn show(
        &mut self,
        schema: &Schema,
        rows: &[Row],
        visible: &[usize],
        is_loading: bool,
        ui: &mut Ui,
    ) -> Response {
        if is_loading {
            return ui
                .vertical_centered(|ui| {
                    ui.add_space(24.0);
                    ui.spinner();
                    ui.label("Loading data…");
                })
                .response;
        }
        if visible.is_empty() {
            return ui
                .vertical_centered(|ui| {
                    ui.add_space(24.0);
                    ui.heading("No results found");
                    ui.label(RichText::new("Try adjusting the filters or clearing them.").weak());
                })
                .response;
        }

        ui.horizontal(|ui| {
            ui.strong("Results");
            if self.config.show_count {
                ui.label(RichText::new(format!("{} record(s) found", visible.len())).weak());
            }
        });

        let id_field = self
            .config
            .id_field
            .as_deref()
            .filter(|key| schema.column(key).is_none());
        let format = CellFormat {
            number_precision: self.config.number_precision,
            date_format: self.config.date_format.as_deref(),
        };

        ui.scope(|ui| {
            let mut builder = TableBuilder::new(ui)
                .striped(self.config.striped)
                .resizable(true)
                .cell_layout(Layout::left_to_right(Align::Center))
                .max_scroll_height(f32::MAX);
            if id_field.is_some() {
                builder = builder.column(TableColumnConfig::auto().at_least(36.0));
            }
            for _ in schema.columns() {
                builder = builder.column(TableColumnConfig::auto().at_least(60.0).clip(true));
            }
            builder
                .header(20.0, |mut header| {
                    if id_field.is_some() {
                        header.col(|ui| {
                            ui.strong("ID");
                        });
                    }
                    for column in schema.columns() {
                        header.col(|ui| {
                            Label::new(RichText::new(column.label.as_str()).strong())
                                .selectable(false)
                                .ui(ui);
                        });
                    }
                })
                .tap_mut(|table| {
                    table.ui_mut().separator();
                })
                .body(|body| {
                    body.rows(self.config.row_height, visible.len(), |mut table_row| {
                        let Some(row) = visible.get(table_row.index()).and_then(|idx| rows.get(*idx))
                        else {
                            return;
                        };
                        if let Some(key) = id_field {
                            let id = row.get(key).map(|v| v.to_text()).unwrap_or_default();
                            table_row.col(|ui| {
                                ui.label(RichText::new(format!("#{id}")).monospace().weak());
                            });
                        }
                        for column in schema.columns() {
                            table_row.col(|ui| {
                                ui.label(cell_text(column, row.get(&column.key), format));
                            });
                        }
                    });
                });
        })
        .response
    }
}

impl Default for DataTable {
    fn default() -> Self {
        Self::new()
    }
}
