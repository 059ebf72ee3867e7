mod poller;

pub use poller::{StatusPoller, StatusSink};

use crate::api::WorkerStatus;
use crate::error::Result;
use eframe::egui::{self, Color32, RichText};

pub const UNAVAILABLE_MESSAGE: &str = "Unable to fetch status";
const PANEL_TITLE: &str = "🤖 Telegram Worker Status";

/// What the status panel shows. Each fetch replaces it wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusView {
    #[default]
    Pending,
    Ready(WorkerStatus),
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub is_error: bool,
}

impl StatusLine {
    fn info(text: String) -> Self {
        Self {
            text,
            is_error: false,
        }
    }

    fn error(text: String) -> Self {
        Self {
            text,
            is_error: true,
        }
    }
}

impl StatusView {
    pub fn from_fetch(result: Result<WorkerStatus>) -> Self {
        match result {
            Ok(status) => StatusView::Ready(status),
            Err(_) => StatusView::Unavailable,
        }
    }

    pub fn lines(&self) -> Vec<StatusLine> {
        let status = match self {
            StatusView::Unavailable => {
                return vec![StatusLine::error(UNAVAILABLE_MESSAGE.to_string())]
            }
            StatusView::Pending => None,
            StatusView::Ready(status) => Some(status),
        };

        let or_dash = |value: Option<&String>| value.cloned().unwrap_or_else(|| "-".to_string());
        let mut lines = vec![
            StatusLine::info(format!(
                "Running: {}",
                status.map_or_else(|| "-".to_string(), |s| s.running.to_string())
            )),
            StatusLine::info(format!(
                "Last Checked: {}",
                or_dash(status.and_then(|s| s.last_checked.as_ref()))
            )),
            StatusLine::info(format!(
                "Last File: {}",
                or_dash(status.and_then(|s| s.last_file.as_ref()))
            )),
            StatusLine::info(format!(
                "Inserted Leaks: {}",
                status.map_or(0, |s| s.inserted_leaks)
            )),
        ];

        if let Some(status) = status.filter(|s| !s.errors.is_empty()) {
            lines.push(StatusLine::error(format!(
                "Errors: {}",
                status.errors.join(", ")
            )));
        }
        lines
    }
}

pub fn show(ui: &mut egui::Ui, view: &StatusView, accent: Color32, alert: Color32) {
    egui::Frame::none()
        .fill(ui.visuals().faint_bg_color)
        .stroke(egui::Stroke::new(1.5, accent))
        .rounding(8.0)
        .inner_margin(egui::Margin::symmetric(24.0, 12.0))
        .show(ui, |ui| {
            ui.set_max_width(500.0);
            ui.label(RichText::new(PANEL_TITLE).strong());
            ui.add_space(4.0);
            for line in view.lines() {
                let color = if line.is_error { alert } else { accent };
                ui.colored_label(color, line.text);
            }
        });
}
