#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod context;
mod helpers;
mod modules;
mod paths;
mod theme;

fn main() -> eframe::Result {
    let base_url = std::env::var("FRAMEDECK_SERVER")
        .unwrap_or_else(|_| "http://127.0.0.1:5000".into());
    eprintln!("[main] extraction server: {base_url}");

    let native_options = eframe::NativeOptions {
        centered: true,
        viewport: egui::ViewportBuilder::default()
            .with_title("🎞 FrameDeck")
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([900.0, 600.0])
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "FrameDeck",
        native_options,
        Box::new(move |cc| Ok(Box::new(app::FrameDeckApp::new(cc, base_url)))),
    )
}
