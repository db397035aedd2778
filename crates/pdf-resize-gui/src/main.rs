#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::Context;
use eframe::egui;

mod app;
mod handlers;
mod logger;
mod ui_components;
mod views;
mod worker;

fn main() -> anyhow::Result<()> {
    let logger = logger::AppLogger::new(200);
    logger
        .clone()
        .init()
        .context("Failed to install logger")?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let handle = runtime.handle().clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([760.0, 520.0])
            .with_title("PDF Resize"),
        ..Default::default()
    };

    eframe::run_native(
        "PDF Resize",
        options,
        Box::new(move |cc| Ok(Box::new(app::ResizeApp::new(cc, handle, logger)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
