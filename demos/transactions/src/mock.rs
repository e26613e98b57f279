use egui_dynfilter::dynfilter_core::{DataError, Row, RowSource, Schema, SchemaError, SchemaSource};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SCHEMA_JSON: &str = include_str!("../../../dynfilter_core/tests/fixtures/schema.json");
const ROWS_JSON: &str = include_str!("../../../dynfilter_core/tests/fixtures/transactions.json");

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    /// Seconds before the column list arrives.
    pub schema_latency: f64,
    /// Seconds before the transactions arrive.
    pub rows_latency: f64,
}

impl Default for MockConfig {
    fn default() -> Self {
        MockConfig {
            schema_latency: 0.3,
            rows_latency: 0.6,
        }
    }
}

/// Simulated request in flight, timed with egui's clock so nothing blocks the UI thread.
struct Request {
    ctx: egui::Context,
    latency: f64,
    started: Option<f64>,
}

impl Request {
    fn new(ctx: egui::Context, latency: f64) -> Self {
        Request {
            ctx,
            latency,
            started: None,
        }
    }

    fn start(&mut self) {
        self.started = Some(self.ctx.input(|i| i.time));
        self.ctx.request_repaint();
    }

    /// True once, when the latency has elapsed.
    fn settled(&mut self) -> bool {
        let Some(started) = self.started else {
            return false;
        };
        let left = started + self.latency - self.ctx.input(|i| i.time);
        if left > 0.0 {
            self.ctx.request_repaint_after(Duration::from_secs_f64(left));
            return false;
        }
        self.started = None;
        true
    }
}

pub struct MockSchema {
    request: Request,
    pub fail_next: bool,
}

impl MockSchema {
    pub fn new(ctx: egui::Context, config: &MockConfig) -> Self {
        MockSchema {
            request: Request::new(ctx, config.schema_latency),
            fail_next: false,
        }
    }
}

impl SchemaSource for MockSchema {
    fn reload(&mut self) {
        log::debug!("Fetching schema");
        self.request.start();
    }

    fn poll(&mut self) -> Option<Result<Schema, SchemaError>> {
        if !self.request.settled() {
            return None;
        }
        if std::mem::take(&mut self.fail_next) {
            return Some(Err(SchemaError::Fetch("503 Service Unavailable".to_string())));
        }
        Some(Schema::from_json(SCHEMA_JSON))
    }
}

pub struct MockRows {
    request: Request,
    pub fail_next: bool,
}

impl MockRows {
    pub fn new(ctx: egui::Context, config: &MockConfig) -> Self {
        MockRows {
            request: Request::new(ctx, config.rows_latency),
            fail_next: false,
        }
    }
}

impl RowSource for MockRows {
    fn reload(&mut self) {
        log::debug!("Fetching transactions");
        self.request.start();
    }

    fn poll(&mut self) -> Option<Result<Vec<Row>, DataError>> {
        if !self.request.settled() {
            return None;
        }
        if std::mem::take(&mut self.fail_next) {
            return Some(Err(DataError::Fetch("connection reset by peer".to_string())));
        }
        Some(Row::parse_many(ROWS_JSON))
    }
}
