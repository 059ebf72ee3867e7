use super::LeakDbApp;
use crate::api::resolve_link;
use crate::theme::BANNER;
use crate::upload;
use crate::utils::file_size::FileSizeUtils;
use crate::{results, status};
use eframe::egui::{self, Align2, Color32, RichText};

impl LeakDbApp {
    pub fn render(&mut self, ctx: &egui::Context) {
        let blocked = self.controller.state().alert().is_some();

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            self.render_footer(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!blocked, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        self.render_header(ui);
                        self.render_banner(ui);
                        ui.add_space(20.0);

                        ui.vertical_centered(|ui| {
                            self.render_upload_area(ui);
                            ui.add_space(20.0);
                            self.render_search_bar(ui);
                            ui.add_space(20.0);
                            status::show(
                                ui,
                                self.controller.state().worker(),
                                self.palette.accent,
                                self.palette.alert,
                            );
                        });

                        results::show(
                            ui,
                            self.controller.state().results(),
                            &self.date_format,
                            self.palette.alert,
                        );
                        ui.add_space(20.0);
                    });
            });
        });

        self.render_alert(ctx);
    }

    fn render_header(&self, ui: &mut egui::Ui) {
        ui.add_space(20.0);
        ui.vertical_centered(|ui| {
            ui.heading(RichText::new("LEAKED DB").strong());
        });
        ui.add_space(10.0);
    }

    fn render_banner(&self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(BANNER)
            .stroke(egui::Stroke::new(2.0, self.palette.alert))
            .inner_margin(egui::Margin::symmetric(0.0, 10.0))
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.colored_label(
                        self.palette.alert,
                        RichText::new("⚠ WARNING: Leaked credentials detected! Use at your own risk.")
                            .size(17.0),
                    );
                });
            });
    }

    fn render_upload_area(&mut self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(ui.visuals().faint_bg_color)
            .stroke(egui::Stroke::new(2.0, self.palette.accent))
            .rounding(10.0)
            .inner_margin(egui::Margin::same(24.0))
            .show(ui, |ui| {
                ui.set_max_width(500.0);
                ui.vertical_centered(|ui| {
                    let button = egui::Button::new("⬆  Click or drag a file here to upload")
                        .min_size(egui::vec2(360.0, 48.0));
                    if ui.add(button).clicked() {
                        if let Some(file) = upload::pick_file() {
                            self.current_file = Some(FileSizeUtils::describe(&file.name, file.size));
                            self.controller.select_file(file);
                        }
                    }
                });
            });

        let state = self.controller.state();
        if state.is_uploading() {
            ui.add_space(12.0);
            if let Some(file) = &self.current_file {
                ui.label(format!("📤 {}", file));
            }
            let progress = state.progress();
            if progress.is_reported() {
                let bar = egui::ProgressBar::new(progress.fraction())
                    .desired_width(400.0)
                    .fill(self.palette.accent)
                    .text(
                        RichText::new(format!("Uploading... {}%", progress.percent()))
                            .color(Color32::BLACK),
                    );
                ui.add(bar);
            } else {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Uploading...");
                });
            }
        }

        if let Some(outcome) = state.outcome() {
            ui.add_space(12.0);
            ui.colored_label(self.palette.alert, "Upload done!");
            ui.horizontal(|ui| {
                ui.label(RichText::new(outcome.inserted_rows.to_string()).strong());
                ui.colored_label(self.palette.alert, "rows added.");
            });
            if let Some(href) = &outcome.json_file_url {
                if ui.link("Download parsed JSON").clicked() {
                    let url = resolve_link(&self.base_url, href);
                    if let Err(e) = open::that(&url) {
                        tracing::warn!("Failed to open {}: {}", url, e);
                    }
                }
            }
        }
    }

    fn render_search_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let width = 350.0_f32;
            ui.add_space(((ui.available_width() - width - 30.0) / 2.0).max(0.0));
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.query)
                    .hint_text("Search leaks...")
                    .desired_width(width),
            );
            ui.label("🔍");

            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                self.controller.search(&self.query);
                response.request_focus();
            }
        });
    }

    fn render_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.controller.state().alert().map(str::to_string) else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new("Error")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_max_width(420.0);
                ui.colored_label(self.palette.alert, message);
                ui.add_space(10.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() || ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        dismissed = true;
                    }
                });
            });

        if dismissed {
            self.controller.dismiss_alert();
        }
    }

    fn render_footer(&self, ui: &mut egui::Ui) {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.label(RichText::new("Backend:").small());
            ui.label(RichText::new(self.base_url.as_str()).small().monospace());
        });
        ui.add_space(4.0);
    }
}
