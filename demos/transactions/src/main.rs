mod mock;

use egui_dynfilter::dynfilter_core::FilterModel;
use egui_dynfilter::{DataTable, DataTableConfig, FilterPanel, FilterPanelConfig};
use mock::{MockConfig, MockRows, MockSchema};
use serde::{Deserialize, Serialize};

#[derive(Default, Serialize, Deserialize)]
#[serde(default)]
struct Settings {
    panel: FilterPanelConfig,
    table: DataTableConfig,
    mock: MockConfig,
}

struct TransactionsApp {
    model: FilterModel<MockSchema, MockRows>,
    panel: FilterPanel,
    table: DataTable,
    settings: Settings,
}

impl TransactionsApp {
    fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings: Settings = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        let ctx = cc.egui_ctx.clone();
        TransactionsApp {
            model: FilterModel::new(
                MockSchema::new(ctx.clone(), &settings.mock),
                MockRows::new(ctx, &settings.mock),
            ),
            panel: FilterPanel::with_config(settings.panel.clone()),
            table: DataTable::with_config(settings.table.clone()),
            settings,
        }
    }

    fn error_banner(&mut self, ui: &mut egui::Ui) {
        let schema_error = self.model.schema_error().map(|e| e.to_string());
        let data_error = self.model.data_error().map(|e| e.to_string());
        if schema_error.is_none() && data_error.is_none() {
            return;
        }
        egui::Frame::new()
            .fill(ui.visuals().error_fg_color.gamma_multiply(0.15))
            .inner_margin(8.0)
            .corner_radius(4.0)
            .show(ui, |ui| {
                if let Some(e) = schema_error {
                    ui.horizontal(|ui| {
                        ui.colored_label(ui.visuals().error_fg_color, format!("⚠ {e}"));
                        if ui.button("Try again").clicked() {
                            self.model.reload_schema();
                        }
                    });
                }
                if let Some(e) = data_error {
                    ui.horizontal(|ui| {
                        ui.colored_label(ui.visuals().error_fg_color, format!("⚠ {e}"));
                        if ui.button("Try again").clicked() {
                            self.model.reload_rows();
                        }
                    });
                }
            });
    }
}

impl eframe::App for TransactionsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.model.poll();
        if self.model.flags().rows_loaded {
            log::info!("{} transactions loaded", self.model.rows().len());
        }

        egui::TopBottomPanel::top("MenuBar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.strong("Dynamic filters");
                ui.separator();
                egui::widgets::global_theme_preference_buttons(ui);
                ui.separator();
                ui.menu_button("Simulate", |ui| {
                    if ui.button("Fail next schema fetch").clicked() {
                        self.model.schema_source_mut().fail_next = true;
                        self.model.reload_schema();
                        ui.close_menu();
                    }
                    if ui.button("Fail next data fetch").clicked() {
                        self.model.row_source_mut().fail_next = true;
                        self.model.reload_rows();
                        ui.close_menu();
                    }
                    if ui.button("Reload data").clicked() {
                        self.model.reload_rows();
                        ui.close_menu();
                    }
                });
                ui.menu_button("View", |ui| {
                    let config = self.table.config_mut();
                    ui.checkbox(&mut config.striped, "Striped rows");
                    ui.checkbox(&mut config.show_count, "Show result count");
                    let mut precision = config.number_precision.unwrap_or(0);
                    if ui
                        .add(egui::Slider::new(&mut precision, 0..=4).text("Decimals"))
                        .changed()
                    {
                        config.number_precision = Some(precision);
                    }
                    let mut day_first = config.date_format.is_some();
                    if ui.checkbox(&mut day_first, "Dates as dd/mm/yyyy").changed() {
                        config.date_format = day_first.then(|| "%d/%m/%Y".to_string());
                    }
                });
                #[cfg(not(target_arch = "wasm32"))]
                {
                    let can_export = self.model.schema().is_some() && !self.model.is_loading();
                    if ui
                        .add_enabled(can_export, egui::Button::new("Save CSV…"))
                        .clicked()
                    {
                        if let Some(schema) = self.model.schema() {
                            egui_dynfilter::util::export_csv(schema, self.model.visible_rows());
                        }
                    }
                }
            });
        });

        egui::SidePanel::left("FilterPanel")
            .resizable(true)
            .default_width(560.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let response = self.panel.show(self.model.session_mut(), ui);
                    if response.applied || response.cleared {
                        self.model.apply();
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.error_banner(ui);
            match self.model.schema() {
                Some(schema) => {
                    self.table.show(
                        schema,
                        self.model.rows(),
                        self.model.visible_indices(),
                        self.model.is_loading(),
                        ui,
                    );
                }
                None if self.model.is_loading() => {
                    ui.centered_and_justified(|ui| ui.spinner());
                }
                None => {}
            }
        });
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.settings.panel = self.panel.config().clone();
        self.settings.table = self.table.config().clone();
        eframe::set_value(storage, eframe::APP_KEY, &self.settings);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result {
    env_logger::init();

    eframe::run_native(
        "Dynamic filters",
        eframe::NativeOptions {
            centered: true,
            ..Default::default()
        },
        Box::new(|cc| Ok(Box::new(TransactionsApp::new(cc)))),
    )
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Redirect `log` message to `console.log` and friends:
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let start_result = eframe::WebRunner::new()
            .start(
                "the_canvas_id",
                web_options,
                Box::new(|cc| Ok(Box::new(TransactionsApp::new(cc)))),
            )
            .await;

        let loading_text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("loading_text"));
        if let Some(loading_text) = loading_text {
            match start_result {
                Ok(_) => {
                    loading_text.remove();
                }
                Err(e) => {
                    loading_text.set_inner_html(
                        "<p> The app has crashed. See the developer console for details. </p>",
                    );
                    panic!("Failed to start eframe: {e:?}");
                }
            }
        }
    });
}
