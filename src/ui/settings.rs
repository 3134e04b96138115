//! Per-file save settings dialog

use std::path::PathBuf;

use eframe::egui;

use confpad::core::config::FileSettings;

/// Dialog editing how one file page saves
#[derive(Debug, Default)]
pub struct SettingsDialog {
    pub visible: bool,
    /// Page the dialog was opened for
    pub target: Option<PathBuf>,
    pub settings: FileSettings,
}

impl SettingsDialog {
    /// Open the dialog for a page
    pub fn open(&mut self, target: PathBuf, settings: FileSettings) {
        self.visible = true;
        self.target = Some(target);
        self.settings = settings;
    }

    /// Show the dialog. Returns the page and its new settings once applied.
    pub fn show(&mut self, ctx: &egui::Context) -> Option<(PathBuf, FileSettings)> {
        let mut result = None;

        if !self.visible {
            return result;
        }

        let title = self
            .target
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| format!("Settings: {}", n.to_string_lossy()))
            .unwrap_or_else(|| "Settings".to_string());

        egui::Window::new(title)
            .id(egui::Id::new("file_settings_dialog"))
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.checkbox(&mut self.settings.overwrite, "Overwrite the opened file")
                    .on_hover_text("Otherwise save next to it as <name>_new");
                ui.checkbox(&mut self.settings.backup, "Keep a .bak copy before replacing");

                ui.separator();

                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        self.visible = false;
                    }
                    if ui.button("Apply").clicked() {
                        if let Some(target) = self.target.take() {
                            result = Some((target, self.settings));
                        }
                        self.visible = false;
                    }
                });
            });

        result
    }
}
