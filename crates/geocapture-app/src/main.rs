//! Main application entry point (native).

#[cfg(feature = "native")]
fn main() -> eframe::Result<()> {
    env_logger::init();
    log::info!("Starting GeoCapture");

    let config = geocapture_app::AppConfig::from_env();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(config.title.clone())
            .with_inner_size([config.width, config.height])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "GeoCapture",
        options,
        Box::new(|cc| Ok(Box::new(geocapture_app::GeoCaptureApp::new(cc, config)))),
    )
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
