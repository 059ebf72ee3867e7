use crate::api::ResultRow;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use std::fmt::Write;
use eframe::egui::{self, Color32, RichText};

pub const COLUMNS: [&str; 5] = ["Software", "URL", "Username", "Password", "Date"];
const MISSING_DATE: &str = "-";

/// Formats a backend date in local time. Naive timestamps are taken as local wall time;
/// anything unparseable (or a format chrono rejects) is shown as sent.
pub fn format_date(date: Option<&str>, format: &str) -> String {
    let Some(raw) = date.map(str::trim).filter(|d| !d.is_empty()) else {
        return MISSING_DATE.to_string();
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return render(&parsed.with_timezone(&Local), format, raw);
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        });

    match naive.and_then(|n| Local.from_local_datetime(&n).earliest()) {
        Some(local) => render(&local, format, raw),
        None => raw.to_string(),
    }
}

fn render(date: &DateTime<Local>, format: &str, raw: &str) -> String {
    let mut out = String::new();
    match write!(out, "{}", date.format(format)) {
        Ok(()) => out,
        Err(_) => raw.to_string(),
    }
}

/// Display cells for each row, in column order.
pub fn table_rows(rows: &[ResultRow], date_format: &str) -> Vec<[String; 5]> {
    rows.iter()
        .map(|row| {
            [
                row.software.clone(),
                row.url.clone(),
                row.username.clone(),
                row.password.clone(),
                format_date(row.date.as_deref(), date_format),
            ]
        })
        .collect()
}

/// Renders the result table; an empty result set renders nothing at all.
pub fn show(ui: &mut egui::Ui, rows: &[ResultRow], date_format: &str, header: Color32) {
    if rows.is_empty() {
        return;
    }

    ui.add_space(10.0);
    ui.label(format!("{} results", rows.len()));
    egui::ScrollArea::horizontal().show(ui, |ui| {
        egui::Grid::new("results_table")
            .striped(true)
            .num_columns(COLUMNS.len())
            .spacing([16.0, 6.0])
            .show(ui, |ui| {
                for column in COLUMNS {
                    ui.label(RichText::new(column).strong().color(header));
                }
                ui.end_row();

                for cells in table_rows(rows, date_format) {
                    for cell in cells {
                        ui.add(egui::Label::new(RichText::new(cell).monospace()).wrap(true));
                    }
                    ui.end_row();
                }
            });
    });
}
