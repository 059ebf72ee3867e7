mod controller;
mod state;
mod ui;

use controller::{Controller, Notify};

use crate::api::Backend;
use crate::config::Config;
use crate::theme::Palette;
use crate::upload;
use crate::utils::file_size::FileSizeUtils;
use eframe::{egui, App};
use reqwest::Url;
use std::sync::Arc;
use tokio::runtime::Handle;

pub struct LeakDbApp {
    controller: Controller,
    query: String,
    /// Label of the file most recently sent to the backend
    current_file: Option<String>,
    base_url: Url,
    date_format: String,
    palette: Palette,
}

impl LeakDbApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: &Config,
        base_url: Url,
        backend: Arc<dyn Backend>,
        runtime: Handle,
    ) -> Self {
        tracing::info!("Initializing LeakDB client against {}", base_url);
        let palette = Palette::from_config(&config.ui);
        palette.apply(&cc.egui_ctx);

        let ctx = cc.egui_ctx.clone();
        let notify: Notify = Arc::new(move || ctx.request_repaint());
        let mut controller = Controller::new(backend, runtime, config.poll.interval(), notify);
        controller.mount();

        Self {
            controller,
            query: String::new(),
            current_file: None,
            base_url,
            date_format: config.ui.date_format.clone(),
            palette,
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        if self.controller.state().alert().is_some() {
            return;
        }
        if let Some(file) = upload::dropped_file(ctx) {
            self.current_file = Some(FileSizeUtils::describe(&file.name, file.size));
            self.controller.select_file(file);
        }
    }
}

impl App for LeakDbApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.controller.pump();
        self.handle_dropped_files(ctx);
        self.render(ctx);
    }
}
