//! Bubble demo: a small conversation rendered with chat-bubbles
//!
//! Pass a PNG or JPEG path as the first argument to show it in an image
//! bubble.

#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("chat_bubbles=debug,bubble_demo=debug,warn")
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting bubble-demo v{}", env!("CARGO_PKG_VERSION"));

    let image_bytes = match std::env::args().nth(1) {
        Some(path) => Some(std::fs::read(&path).with_context(|| format!("Failed to read {}", path))?),
        None => None,
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Chat Bubbles")
            .with_inner_size([480.0, 720.0])
            .with_min_inner_size([320.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Chat Bubbles",
        native_options,
        Box::new(move |cc| Ok(Box::new(app::BubbleApp::new(cc, image_bytes)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run application: {}", e))
}
