//! File notebook: one tab per open document

use eframe::egui;

use confpad::core::config::UiConfig;
use confpad::core::session::FileSession;

use super::tree_table::{self, TreeTable};
use crate::app::ConfpadApp;

/// Toolbar commands of a file page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageCommand {
    Save,
    Process,
    Settings,
}

/// Tabbed file pages
pub struct FilePagePanel;

impl FilePagePanel {
    pub fn show(ui: &mut egui::Ui, app: &mut ConfpadApp) {
        if app.pages.is_empty() {
            Self::show_welcome(ui);
            return;
        }

        ui.vertical(|ui| {
            Self::show_tabs(ui, app);
            ui.separator();

            let Some(index) = app.active else {
                return;
            };

            if let Some(command) = Self::show_toolbar(ui) {
                match command {
                    PageCommand::Save => app.save_page(index),
                    PageCommand::Process => app.process_page(index),
                    PageCommand::Settings => app.open_settings(index),
                }
            }
            ui.separator();

            let header_height = app.config.ui.header_height;
            if let Some(page) = app.pages.get_mut(index) {
                egui::TopBottomPanel::bottom(egui::Id::new(("header_panel", &page.path)))
                    .resizable(true)
                    .default_height(header_height)
                    .show_inside(ui, |ui| Self::show_header(ui, page));

                let outcome = Self::show_tree(ui, page, &app.config.ui);
                if let Err(e) = outcome {
                    app.report_error(e);
                }
            }
        });
    }

    fn show_tabs(ui: &mut egui::Ui, app: &mut ConfpadApp) {
        let mut close = None;

        ui.horizontal_wrapped(|ui| {
            for (index, page) in app.pages.iter().enumerate() {
                let is_active = app.active == Some(index);
                let tab = ui
                    .selectable_label(is_active, page.title())
                    .on_hover_text(page.path.display().to_string());
                if tab.clicked() {
                    app.active = Some(index);
                }
                if ui.small_button("\u{2715}").on_hover_text("Close").clicked() {
                    close = Some(index);
                }
                ui.add_space(8.0);
            }
        });

        if let Some(index) = close {
            app.close_page(index);
        }
    }

    fn show_toolbar(ui: &mut egui::Ui) -> Option<PageCommand> {
        let mut command = None;

        ui.horizontal(|ui| {
            if ui.button("\u{1F4BE} Save").on_hover_text("Save the file").clicked() {
                command = Some(PageCommand::Save);
            }
            ui.add_space(32.0);
            if ui.button("\u{25B6} Process").on_hover_text("Process file").clicked() {
                command = Some(PageCommand::Process);
            }
            ui.add_space(32.0);
            if ui
                .button("\u{2699} Settings")
                .on_hover_text("Change file settings")
                .clicked()
            {
                command = Some(PageCommand::Settings);
            }
        });

        command
    }

    fn show_tree(
        ui: &mut egui::Ui,
        page: &mut FileSession,
        config: &UiConfig,
    ) -> anyhow::Result<()> {
        let rows = tree_table::flatten(&page.projection.view(&page.document), &page.expanded)?;

        let actions = egui::ScrollArea::horizontal()
            .id_salt("tree_scroll")
            .show(ui, |ui| TreeTable::show(ui, &rows, &page.expanded, config))
            .inner;

        for handle in actions.toggled {
            page.toggle(handle);
        }
        for (handle, name) in actions.renamed {
            page.rename(handle, &name)?;
        }
        Ok(())
    }

    fn show_header(ui: &mut egui::Ui, page: &FileSession) {
        let mut summary = page.document.header().summary();
        ui.add(
            egui::TextEdit::multiline(&mut summary)
                .interactive(false)
                .desired_width(f32::INFINITY),
        );
    }

    fn show_welcome(ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(100.0);

            ui.heading("Confpad");
            ui.add_space(20.0);

            ui.label("Open a folder or a document to get started.");
            ui.add_space(10.0);

            ui.label("Keyboard shortcuts:");
            ui.label("  Ctrl+S - Save");
            ui.label("  Ctrl+B - Toggle sidebar");
        });
    }
}
