use crosshair_overlay::controller::OverlayController;
use crosshair_overlay::gui::CrosshairApp;
use crosshair_overlay::image_source::ImageResolver;
use crosshair_overlay::logging;
use crosshair_overlay::settings::{Settings, SETTINGS_FILE};
use crosshair_overlay::storage::FileStore;

use eframe::egui;

fn main() -> anyhow::Result<()> {
    let settings = Settings::load(SETTINGS_FILE)?;
    logging::init(settings.debug_logging, settings.log_path());

    let data_dir = settings.data_dir();
    tracing::info!(dir = %data_dir.display(), "using data directory");

    let mut controller = OverlayController::new(FileStore::new(data_dir), ImageResolver::default());
    controller.initialize()?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Crosshair")
            .with_inner_size([390.0, 300.0])
            .with_transparent(true)
            .with_decorations(false)
            .with_always_on_top(),
        ..Default::default()
    };

    let click_through = settings.click_through;
    eframe::run_native(
        "Crosshair",
        native_options,
        Box::new(move |cc| Box::new(CrosshairApp::new(&cc.egui_ctx, controller, click_through))),
    )
    .map_err(|e| anyhow::anyhow!("preview window failed: {e}"))?;
    Ok(())
}
