pub mod data_table;
pub mod filter_panel;
pub mod util;

pub use data_table::{DataTable, DataTableConfig};
pub use dynfilter_core;
pub use filter_panel::{FilterPanel, FilterPanelConfig, FilterPanelResponse};
