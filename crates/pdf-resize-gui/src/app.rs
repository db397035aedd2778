use eframe::egui;
use pdf_async_runtime::{DocumentId, PdfCommand, PdfUpdate};
use pdf_resize::constants::{PDF_EXTENSION, SUCCESS_DISPLAY_DURATION};
use pdf_resize::{PresetList, ResizeSession, SaveOutcome, SaveStatus};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::logger::AppLogger;
use crate::views::{self, ViewState};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct ResizeApp {
    session: ResizeSession,
    presets: PresetList,
    view: ViewState,
    doc_id: Option<DocumentId>,
    loading: bool,
    status: String,

    /// Generation of the save whose success message is showing, and when it expires
    success_until: Option<(u64, Instant)>,
    logger: AppLogger,

    // Async infrastructure
    command_tx: mpsc::UnboundedSender<PdfCommand>,
    update_rx: mpsc::UnboundedReceiver<PdfUpdate>,
    _tokio_handle: tokio::runtime::Handle,
}

impl ResizeApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        tokio_handle: tokio::runtime::Handle,
        logger: AppLogger,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        tokio_handle.spawn(crate::worker::worker_task(command_rx, update_tx));

        Self {
            session: ResizeSession::new(),
            presets: PresetList::default(),
            view: ViewState::default(),
            doc_id: None,
            loading: false,
            status: String::new(),
            success_until: None,
            logger,
            command_tx,
            update_rx,
            _tokio_handle: tokio_handle,
        }
    }

    fn send(&mut self, command: PdfCommand) {
        if self.command_tx.send(command).is_err() {
            self.status = format!("Error: {}", pdf_async_runtime::ChannelError::Disconnected);
        }
    }

    fn load(&mut self, path: PathBuf) {
        self.status = format!("Loading {}…", path.display());
        self.loading = true;
        self.send(PdfCommand::Load { path });
    }

    fn close_document(&mut self) {
        self.session.close_document();
        self.success_until = None;
        if let Some(doc_id) = self.doc_id.take() {
            self.send(PdfCommand::Close { doc_id });
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });
        let pdf = dropped.into_iter().find(|path| {
            path.extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(PDF_EXTENSION))
        });
        if let Some(path) = pdf {
            self.load(path);
        }
    }

    fn process_updates(&mut self) {
        while let Ok(update) = self.update_rx.try_recv() {
            match update {
                PdfUpdate::Loaded {
                    doc_id,
                    path,
                    file_name,
                    info,
                } => {
                    self.loading = false;
                    let pages = info.page_count();
                    match self.session.load_document(info, Some(path.as_path()), file_name) {
                        Ok(()) => {
                            if let Some(old) = self.doc_id.replace(doc_id) {
                                self.send(PdfCommand::Close { doc_id: old });
                            }
                            self.view.reset_for_document();
                            self.success_until = None;
                            self.status = format!("Loaded {} ({} pages)", path.display(), pages);
                        }
                        Err(e) => {
                            self.send(PdfCommand::Close { doc_id });
                            self.status = format!("Cannot open {}: {e}", path.display());
                        }
                    }
                }
                PdfUpdate::SaveComplete { generation, paths } => {
                    let count = paths.len();
                    self.session.finish_write(generation, Ok(paths));
                    if self.session.workflow().generation() == generation
                        && *self.session.save_status() == SaveStatus::Success
                    {
                        self.success_until =
                            Some((generation, Instant::now() + SUCCESS_DISPLAY_DURATION));
                        self.status = format!("Saved {count} file(s)");
                    }
                }
                PdfUpdate::SaveConflict {
                    generation,
                    request,
                    conflicts,
                } => {
                    self.session.finish_save(
                        generation,
                        request,
                        Ok(SaveOutcome::Conflict(conflicts)),
                    );
                }
                PdfUpdate::SaveFailed {
                    generation,
                    message,
                } => {
                    self.session.fail_save(generation, message);
                }
                PdfUpdate::Closed { doc_id } => {
                    log::debug!("Worker released {:?}", doc_id);
                }
                PdfUpdate::ConfigLoaded { options } => {
                    if let Err(e) = options.validate() {
                        log::warn!("Configuration is incomplete: {e}");
                    }
                    self.session.apply_options(&options);
                    self.status = "Configuration loaded".to_string();
                }
                PdfUpdate::ConfigSaved { path } => {
                    self.status = format!("Configuration saved to {}", path.display());
                }
                PdfUpdate::PresetsLoaded { presets } => {
                    self.status = format!("Loaded {} presets", presets.len());
                    self.presets = presets;
                }
                PdfUpdate::PresetsSaved { path } => {
                    self.status = format!("Presets saved to {}", path.display());
                }
                PdfUpdate::Error { message } => {
                    log::error!("{message}");
                    self.loading = false;
                    self.status = format!("Error: {message}");
                }
            }
        }
    }

    fn expire_success(&mut self, ctx: &egui::Context) {
        let Some((generation, until)) = self.success_until else {
            return;
        };
        let now = Instant::now();
        if now >= until {
            self.session.expire_success(generation);
            self.success_until = None;
        } else {
            ctx.request_repaint_after(until - now);
        }
    }

    fn show_menu(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("📂 Open PDF…").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("PDF", &["pdf"])
                    .pick_file()
                {
                    self.load(path);
                }
            }
            if ui
                .add_enabled(self.doc_id.is_some(), egui::Button::new("Close"))
                .clicked()
            {
                self.close_document();
            }
            ui.separator();
            if ui.button("Presets…").clicked() {
                self.view.show_presets = true;
            }
            if ui.button("Load configuration…").clicked() {
                views::load_configuration_dialog(&self.command_tx);
            }
            if ui.button("Save configuration…").clicked() {
                views::save_configuration_dialog(self.session.to_options(), &self.command_tx);
            }
        });
    }

    fn status_line(&self) -> String {
        if !self.status.is_empty() {
            return self.status.clone();
        }
        self.logger.latest_message().unwrap_or_default()
    }
}

impl eframe::App for ResizeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        self.process_updates();
        self.expire_success(ctx);
        self.view.sync(&self.session);

        egui::TopBottomPanel::top("menu").show(ctx, |ui| self.show_menu(ui));

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.loading {
                    ui.spinner();
                }
                ui.label(self.status_line());
            });
            egui::CollapsingHeader::new("Log").show(ui, |ui| {
                for entry in self.logger.recent(8) {
                    ui.monospace(format!(
                        "{} {:<5} {}: {}",
                        entry.timestamp.format("%H:%M:%S"),
                        entry.level,
                        entry.target,
                        entry.message
                    ));
                }
                if ui.small_button("Clear").clicked() {
                    self.logger.clear();
                }
            });
        });

        egui::SidePanel::right("controls")
            .min_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    views::show_trim(ui, &mut self.session, &mut self.view);
                    ui.separator();
                    views::show_adjusters(ui, &mut self.session, &mut self.view, &self.presets);
                    ui.separator();
                    views::show_filename(ui, &mut self.session, &mut self.view);
                    ui.separator();
                    views::show_destination(ui, &mut self.session, &mut self.view);
                    ui.separator();
                    views::show_save(
                        ui,
                        &mut self.session,
                        &self.view,
                        self.doc_id,
                        &self.command_tx,
                    );
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            views::show_document(ui, &mut self.session, &self.view, &self.command_tx);
        });

        views::show_save_dialogs(
            ctx,
            &mut self.session,
            &self.view,
            self.doc_id,
            &self.command_tx,
        );
        views::show_presets_window(ctx, &mut self.presets, &mut self.view, &self.command_tx);

        if self.loading || self.session.workflow().is_saving() {
            ctx.request_repaint_after(POLL_INTERVAL);
        }
    }
}
