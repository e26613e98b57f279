use chrono::{DateTime, NaiveDate};
use dynfilter_core::{Column, FieldValue, Row, Scalar, Schema, ValueType};
use itertools::Itertools;
use std::io::Write;

/// How cells render numbers and dates. The default prints values as they are.
#[derive(Clone, Copy, Debug, Default)]
pub struct CellFormat<'a> {
    /// Digits after the decimal point for numbers.
    pub number_precision: Option<usize>,
    /// chrono format string for date columns, e.g. `%d/%m/%Y`.
    pub date_format: Option<&'a str>,
}

/// Display text of a row field: option values become their labels, booleans read Yes/No and
/// list fields are joined with `", "`. Missing fields are blank.
pub fn cell_text(column: &Column, value: Option<&FieldValue>, format: CellFormat<'_>) -> String {
    match value {
        None => String::new(),
        Some(FieldValue::List(items)) => items
            .iter()
            .map(|s| scalar_text(column, s, format))
            .join(", "),
        Some(FieldValue::Scalar(s)) => scalar_text(column, s, format),
    }
}

fn scalar_text(column: &Column, value: &Scalar, format: CellFormat<'_>) -> String {
    if let Some(label) = column.option_label(value) {
        return label.to_string();
    }
    match (value, column.ty) {
        (Scalar::Bool(true), ValueType::Boolean) => "Yes".to_string(),
        (Scalar::Bool(false), ValueType::Boolean) => "No".to_string(),
        (Scalar::Number(n), _) if n.is_finite() => match format.number_precision {
            Some(precision) => format!("{n:.precision$}"),
            None => value.to_text(),
        },
        (Scalar::Str(text), ValueType::Date) => format
            .date_format
            .and_then(|pattern| format_date(text, pattern))
            .unwrap_or_else(|| text.clone()),
        _ => value.to_text(),
    }
}

/// `text` as an ISO date (or RFC 3339 timestamp) rendered with `pattern`.
/// `None` when either does not parse.
fn format_date(text: &str, pattern: &str) -> Option<String> {
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(text).map(|dt| dt.date_naive()))
        .ok()?;
    let mut out = String::new();
    std::fmt::write(&mut out, format_args!("{}", date.format(pattern))).ok()?;
    Some(out)
}

/// Write `rows` as CSV: one column per schema column in schema order, header row of column
/// labels, cells as shown in the table but with full number precision and ISO dates.
pub fn write_csv<'a, W: Write>(
    writer: W,
    schema: &Schema,
    rows: impl IntoIterator<Item = &'a Row>,
) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(schema.columns().map(|c| c.label.as_str()))?;
    for row in rows {
        wtr.write_record(
            schema
                .columns()
                .map(|c| cell_text(c, row.get(&c.key), CellFormat::default())),
        )?;
    }
    wtr.flush()?;
    Ok(())
}

/// Ask for a file name and save `rows` there as CSV. Failures are logged.
#[cfg(not(target_arch = "wasm32"))]
pub fn export_csv<'a>(schema: &Schema, rows: impl IntoIterator<Item = &'a Row>) {
    let Some(path) = rfd::FileDialog::new()
        .add_filter("CSV", &["csv"])
        .set_file_name("filtered.csv")
        .save_file()
    else {
        return;
    };
    let file = match std::fs::File::create(&path) {
        Ok(file) => file,
        Err(e) => {
            log::warn!("Cannot create {}: {e}", path.display());
            return;
        }
    };
    match write_csv(file, schema, rows) {
        Ok(()) => log::debug!("Saved {}", path.display()),
        Err(e) => log::warn!("CSV export to {} failed: {e}", path.display()),
    }
}
