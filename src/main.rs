//! Confpad - desktop editor for structured configuration documents
//!
//! Shows a document as a tree of object types and their objects, with
//! renaming, a cleanup pass and save.

mod app;
mod ui;

use app::ConfpadApp;
use eframe::egui;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::filter::LevelFilter::INFO)
        .init();

    tracing::info!("Starting Confpad...");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 720.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("Confpad"),
        ..Default::default()
    };

    eframe::run_native(
        "Confpad",
        native_options,
        Box::new(|cc| Ok(Box::new(ConfpadApp::new(cc)))),
    )
}
