//! Workspace panel listing the documents of a folder

use std::path::PathBuf;

use eframe::egui;

use confpad::core::file_system::FileNode;

use crate::app::ConfpadApp;

/// Workspace panel
pub struct FileTreePanel;

impl FileTreePanel {
    pub fn show(ui: &mut egui::Ui, app: &mut ConfpadApp) {
        ui.vertical(|ui| {
            ui.horizontal(|ui| {
                ui.heading("Workspace");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("\u{21BB}").on_hover_text("Refresh").clicked() {
                        app.refresh_workspace();
                    }
                });
            });

            ui.add(
                egui::TextEdit::singleline(&mut app.search)
                    .hint_text("Search documents")
                    .desired_width(f32::INFINITY),
            );

            ui.separator();

            let mut open = None;

            egui::ScrollArea::vertical()
                .id_salt("file_tree_scroll")
                .show(ui, |ui| {
                    if app.file_tree.root.is_none() {
                        ui.label("No folder open");
                        ui.add_space(10.0);
                        if ui.button("Open Folder...").clicked() {
                            if let Some(path) = rfd::FileDialog::new().pick_folder() {
                                app.open_folder(path);
                            }
                        }
                    } else if !app.search.trim().is_empty() {
                        for path in app.file_tree.search(app.search.trim()) {
                            let name = path
                                .file_name()
                                .map(|n| n.to_string_lossy().to_string())
                                .unwrap_or_default();
                            let is_open = app.is_open(path);
                            if ui
                                .selectable_label(is_open, format!("\u{1F4C4} {name}"))
                                .on_hover_text(path.display().to_string())
                                .clicked()
                            {
                                open = Some(path.to_path_buf());
                            }
                        }
                    } else if let Some(root) = app.file_tree.root.clone() {
                        let mut toggled = None;
                        Self::show_node(ui, &root, app, &mut open, &mut toggled);
                        if let Some(path) = toggled {
                            app.file_tree.toggle_expanded(&path);
                        }
                    }
                });

            if let Some(path) = open {
                app.open_document(path);
            }
        });
    }

    fn show_node(
        ui: &mut egui::Ui,
        node: &FileNode,
        app: &ConfpadApp,
        open: &mut Option<PathBuf>,
        toggled: &mut Option<PathBuf>,
    ) {
        if node.is_dir {
            let id = ui.make_persistent_id(&node.path);
            egui::collapsing_header::CollapsingState::load_with_default_open(
                ui.ctx(),
                id,
                node.expanded,
            )
            .show_header(ui, |ui| {
                let icon = if node.expanded { "\u{1F4C2}" } else { "\u{1F4C1}" };
                if ui
                    .selectable_label(false, format!("{} {}", icon, node.name))
                    .clicked()
                {
                    *toggled = Some(node.path.clone());
                }
            })
            .body(|ui| {
                for child in &node.children {
                    Self::show_node(ui, child, app, open, toggled);
                }
            });
        } else {
            let is_open = app.is_open(&node.path);
            ui.horizontal(|ui| {
                ui.add_space(16.0);
                if ui
                    .selectable_label(is_open, format!("\u{1F4C4} {}", node.name))
                    .clicked()
                {
                    *open = Some(node.path.clone());
                }
            });
        }
    }
}
