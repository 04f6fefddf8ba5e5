use std::{collections::HashMap, fs, time::Duration};

use eframe::egui::{self, Key, RichText};
use egui_notify::Toasts;
use gv_graphics::{CanvasConfig, CanvasId, Mode};
use tracing::{debug, warn};
use web_time::Instant;

use crate::{
    canvas_ui::CanvasUi,
    command::{Command, CommandError},
    workspace::Workspace,
};

pub struct App {
    workspace: Workspace,
    canvas_uis: HashMap<CanvasId, CanvasUi>,
    command_line: String,
    toasts: Toasts,
}

impl App {
    /// Called once before the first frame.
    #[must_use]
    pub fn new(_cc: &eframe::CreationContext<'_>, config: CanvasConfig, step: Duration) -> Self {
        Self {
            workspace: Workspace::new(config, step),
            canvas_uis: HashMap::new(),
            command_line: String::new(),
            toasts: Toasts::default(),
        }
    }

    fn run_command(&mut self) {
        let line = std::mem::take(&mut self.command_line);
        if line.trim().is_empty() {
            return;
        }
        match Command::parse(&line).and_then(|command| command.run(&mut self.workspace)) {
            Ok(Some(message)) => {
                self.toasts.info(message);
            }
            Ok(None) => {}
            Err(err) => self.report(&err),
        }
    }

    fn report(&mut self, err: &CommandError) {
        warn!("{err}");
        self.toasts.error(err.to_string());
    }

    fn export_svg(&mut self) {
        let Some(canvas) = self.workspace.active() else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("SVG", &["svg"])
            .save_file()
        else {
            return;
        };
        let document = canvas.surface().to_svg();
        match fs::write(&path, document.to_string()) {
            Ok(()) => {
                self.toasts.info(format!("saved {}", path.display()));
            }
            Err(err) => self.report(&err.into()),
        }
    }

    fn menu_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            ui.visuals_mut().button_frame = false;
            egui::widgets::global_theme_preference_switch(ui);

            ui.separator();

            let current = self.workspace.active().map(gv_graphics::Canvas::mode);
            for mode in Mode::ALL {
                if ui
                    .selectable_label(current == Some(mode), mode.name())
                    .clicked()
                {
                    if let Some(canvas) = self.workspace.active_mut() {
                        canvas.set_mode(mode);
                    }
                }
            }

            ui.separator();

            if ui.button("New canvas").clicked() {
                self.workspace.new_canvas();
            }
            if ui.button("Duplicate").clicked() {
                if let Some(id) = self.workspace.active_id() {
                    self.workspace.duplicate(id);
                }
            }
            if ui.button("Export SVG…").clicked() {
                self.export_svg();
            }
        });
    }

    fn status_ui(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if let Some(canvas) = self.workspace.active() {
                ui.label(format!("canvas {}", canvas.id()));
                ui.separator();
                ui.label(RichText::new(canvas.mode().name()).monospace());
            }
            if let Some(report) = self.workspace.stretch().report() {
                ui.separator();
                ui.label(format!(
                    "distortion {:.3}, {} bad pairs",
                    report.distortion,
                    report.bad_pairs.len()
                ));
            }
            if self.workspace.is_animating() {
                ui.separator();
                ui.label("bfs running");
            }
        });
    }

    fn command_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(RichText::new(":").monospace());
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.command_line)
                    .font(egui::TextStyle::Monospace)
                    .desired_width(f32::INFINITY),
            );
            if response.lost_focus() && ui.input(|input| input.key_pressed(Key::Enter)) {
                self.run_command();
                response.request_focus();
            }
        });
    }

    fn canvases_ui(&mut self, ui: &mut egui::Ui) {
        let ids: Vec<CanvasId> = self.workspace.canvases().map(gv_graphics::Canvas::id).collect();
        let active = self.workspace.active_id();
        let mut clicked = None;
        let mut errors = Vec::new();
        ui.columns(ids.len().max(1), |columns| {
            for (column, &id) in columns.iter_mut().zip(&ids) {
                let Some(canvas) = self.workspace.canvas_mut(id) else {
                    continue;
                };
                let heading = if active == Some(id) {
                    RichText::new(format!("canvas {id}")).strong()
                } else {
                    RichText::new(format!("canvas {id}"))
                };
                column.label(heading);
                egui::Frame::canvas(column.style()).show(column, |ui| {
                    match self.canvas_uis.entry(id).or_default().ui(ui, canvas) {
                        Ok(true) => clicked = Some(id),
                        Ok(false) => {}
                        Err(err) => {
                            clicked = Some(id);
                            errors.push(err);
                        }
                    }
                });
            }
        });
        if let Some(id) = clicked.filter(|&id| active != Some(id)) {
            debug!(canvas = %id, "activating canvas");
            self.workspace.set_active(id);
        }
        for err in errors {
            self.report(&err.into());
        }
        self.canvas_uis.retain(|id, _| ids.contains(id));
        self.workspace.refresh();
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Err(err) = self.workspace.tick(Instant::now()) {
            self.report(&err.into());
        }
        if self.workspace.is_animating() {
            ctx.request_repaint_after(self.workspace.step.min(Duration::from_millis(50)));
        }

        egui::TopBottomPanel::top("menu").show(ctx, |ui| self.menu_ui(ui));

        egui::TopBottomPanel::bottom("command").show(ctx, |ui| {
            self.command_ui(ui);
            self.status_ui(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| self.canvases_ui(ui));

        self.toasts.show(ctx);
    }
}
