use crate::config::UiConfig;
use crate::utils::color::ColorExt;
use eframe::egui::{self, Color32, FontFamily, FontId, Stroke, TextStyle};

const BACKGROUND: Color32 = Color32::from_rgb(0x11, 0x11, 0x11);
const PANEL: Color32 = Color32::from_rgb(0x18, 0x18, 0x18);
const SURFACE: Color32 = Color32::from_rgb(0x22, 0x22, 0x22);
pub const BANNER: Color32 = Color32::from_rgb(0x2a, 0x00, 0x00);
const DEFAULT_ACCENT: Color32 = Color32::from_rgb(0x39, 0xff, 0x14);
const DEFAULT_ALERT: Color32 = Color32::from_rgb(0xff, 0x17, 0x44);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub accent: Color32,
    pub alert: Color32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            accent: DEFAULT_ACCENT,
            alert: DEFAULT_ALERT,
        }
    }
}

fn color_or(value: &str, key: &str, fallback: Color32) -> Color32 {
    Color32::parse_hex(value).unwrap_or_else(|| {
        tracing::warn!("ui.{} = {:?} is not a #rrggbb color, using default", key, value);
        fallback
    })
}

impl Palette {
    pub fn from_config(ui: &UiConfig) -> Self {
        Self {
            accent: color_or(&ui.accent_color, "accent_color", DEFAULT_ACCENT),
            alert: color_or(&ui.alert_color, "alert_color", DEFAULT_ALERT),
        }
    }

    /// Dark terminal look: monospace everywhere, accent text on near-black panels.
    pub fn apply(&self, ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();

        style.text_styles = [
            (TextStyle::Heading, FontId::new(32.0, FontFamily::Monospace)),
            (TextStyle::Body, FontId::new(15.0, FontFamily::Monospace)),
            (TextStyle::Monospace, FontId::new(14.0, FontFamily::Monospace)),
            (TextStyle::Button, FontId::new(15.0, FontFamily::Monospace)),
            (TextStyle::Small, FontId::new(11.0, FontFamily::Monospace)),
        ]
        .into();

        let visuals = &mut style.visuals;
        *visuals = egui::Visuals::dark();
        visuals.override_text_color = Some(self.accent);
        visuals.panel_fill = BACKGROUND;
        visuals.window_fill = PANEL;
        visuals.faint_bg_color = PANEL;
        visuals.extreme_bg_color = SURFACE;
        visuals.hyperlink_color = self.accent;
        visuals.selection.bg_fill = self.accent;
        visuals.selection.stroke = Stroke::new(1.0, BACKGROUND);
        visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, self.accent);
        visuals.widgets.hovered.bg_stroke = Stroke::new(1.5, self.alert);
        visuals.error_fg_color = self.alert;

        ctx.set_style(style);
    }
}
