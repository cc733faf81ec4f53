mod egui_host;

pub use egui_host::{EguiHost, PendingCenter};

use crate::common::file_dialog;
use crate::controller::OverlayController;
use crate::host::{DisplayMode, HostSignalSender};
use crate::storage::FileStore;
use eframe::egui;

/// Preview window for the crosshair widget.
pub struct CrosshairApp {
    controller: OverlayController<FileStore>,
    signals: HostSignalSender,
    texture: Option<(u64, egui::TextureHandle)>,
    focused: Option<bool>,
    click_through: bool,
    center: PendingCenter,
}

impl CrosshairApp {
    pub fn new(
        ctx: &egui::Context,
        mut controller: OverlayController<FileStore>,
        click_through: bool,
    ) -> Self {
        let host = EguiHost::new(ctx.clone());
        let center = host.pending_center();
        controller.attach_host(Box::new(host));
        let signals = controller.signal_sender();

        // The real host raises this from its own dispatch thread.
        let startup = signals.clone();
        std::thread::spawn(move || startup.click_through_changed(click_through));
        ctx.send_viewport_cmd(egui::ViewportCommand::MousePassthrough(click_through));

        Self {
            controller,
            signals,
            texture: None,
            focused: None,
            click_through,
            center,
        }
    }

    fn emit_host_signals(&mut self, ctx: &egui::Context) {
        let focused = ctx.input(|i| i.viewport().focused);
        if focused.is_some() && focused != self.focused {
            self.focused = focused;
            let mode = if focused == Some(true) {
                DisplayMode::Normal
            } else {
                DisplayMode::PinnedOnly
            };
            self.signals.display_mode_changed(mode);
        }
        if ctx.input(|i| i.key_pressed(egui::Key::F9)) {
            self.click_through = !self.click_through;
            ctx.send_viewport_cmd(egui::ViewportCommand::MousePassthrough(self.click_through));
            self.signals.click_through_changed(self.click_through);
        }
    }

    fn sync_texture(&mut self, ctx: &egui::Context) {
        let generation = self.controller.image_generation();
        if matches!(&self.texture, Some((g, _)) if *g == generation) {
            return;
        }
        let Some(image) = self.controller.image() else {
            self.texture = None;
            return;
        };
        let size = [image.pixel_width() as usize, image.pixel_height() as usize];
        let color = egui::ColorImage::from_rgba_unmultiplied(size, image.bitmap().as_raw());
        let tex = ctx.load_texture("crosshair", color, egui::TextureOptions::LINEAR);
        self.texture = Some((generation, tex));
    }

    fn menu(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Select Image").clicked() {
                let picked = file_dialog::pick_png();
                // failures are already recorded as a notice
                let _ = self.controller.select_image_file(picked.as_deref());
            }
            if ui.button("Reset Image").clicked() {
                if let Err(e) = self.controller.reset() {
                    tracing::error!(error = %e, "reset failed");
                }
            }
            ui.separator();
            ui.label("Offset Y");
            let mut text = self.controller.offset_field().text().to_string();
            let mut output = egui::TextEdit::singleline(&mut text)
                .desired_width(80.0)
                .show(ui);
            if output.response.changed() {
                let cursor = output
                    .cursor_range
                    .map(|r| r.primary.ccursor.index)
                    .unwrap_or_else(|| text.chars().count());
                let field = self.controller.offset_field_mut();
                if field.on_text_changed(&text, cursor) {
                    // egui keeps its own caret; move it to the repaired spot
                    place_caret(&mut output.state, field.cursor());
                    output.state.store(ui.ctx(), output.response.id);
                }
            }
            if ui.button("Set Position").clicked() {
                let _ = self.controller.apply_offset_field();
            }
        });
    }
}

fn place_caret(state: &mut egui::text_edit::TextEditState, index: usize) {
    let caret = egui::text::CCursorRange::one(egui::text::CCursor::new(index));
    state.cursor.set_char_range(Some(caret));
}

impl eframe::App for CrosshairApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.emit_host_signals(ctx);
        self.controller.pump_host_signals();
        self.sync_texture(ctx);
        self.center.poll(ctx);

        egui::TopBottomPanel::top("menu").show_animated(ctx, self.controller.menu_visible(), |ui| {
            self.menu(ui);
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let warning = self.controller.warning_message();
                if !warning.is_empty() {
                    ui.colored_label(egui::Color32::YELLOW, warning);
                }
                let mut dismiss = false;
                if let Some(notice) = self.controller.notice() {
                    ui.horizontal(|ui| {
                        ui.colored_label(egui::Color32::RED, notice.label());
                        dismiss = ui.small_button("x").clicked();
                    });
                }
                if dismiss {
                    self.controller.dismiss_notice();
                }

                if let Some((_, tex)) = &self.texture {
                    let area = ui.max_rect();
                    let size = tex.size_vec2();
                    let top = area.top() + self.controller.image_margin_top() as f32;
                    let rect = egui::Rect::from_min_size(
                        egui::pos2(area.center().x - size.x / 2.0, top),
                        size,
                    );
                    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                    ui.painter().image(tex.id(), rect, uv, egui::Color32::WHITE);
                }
            });
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0, 0.0, 0.0, 0.0]
    }
}

#[cfg(test)]
mod tests {
    use super::place_caret;
    use crate::offset_input::OffsetField;
    use eframe::egui;

    #[test]
    fn repaired_caret_is_written_back() {
        let mut field = OffsetField::new("12");
        assert!(field.on_text_changed("12a", 3));
        assert_eq!(field.text(), "12");

        let mut state = egui::text_edit::TextEditState::default();
        place_caret(&mut state, field.cursor());
        let range = state.cursor.char_range().unwrap();
        assert_eq!(range.primary.index, 2);
        assert_eq!(range.secondary.index, 2);
    }
}
