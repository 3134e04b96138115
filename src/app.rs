//! Main application state and UI coordination

use std::fmt::Display;
use std::path::{Path, PathBuf};

use eframe::egui;

use confpad::core::{config::AppConfig, file_system::FileTree, session::FileSession};

use crate::ui::{file_page::FilePagePanel, file_tree::FileTreePanel, settings::SettingsDialog};

/// Main application state
pub struct ConfpadApp {
    /// Workspace folder contents
    pub file_tree: FileTree,
    /// Open documents, in tab order
    pub pages: Vec<FileSession>,
    /// Index of the active tab
    pub active: Option<usize>,
    /// Application configuration
    pub config: AppConfig,
    /// Workspace search query
    pub search: String,
    /// Whether sidebar is visible
    pub sidebar_visible: bool,
    /// Last message for the status bar
    pub status: Option<String>,
    /// Save settings dialog
    pub settings_dialog: SettingsDialog,
    /// Where the configuration is persisted, if anywhere
    config_path: Option<PathBuf>,
}

impl ConfpadApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let config_path = AppConfig::default_path();
        if config_path.is_none() {
            tracing::warn!("Could not determine config directory, settings will not persist");
        }

        let config = match config_path {
            Some(ref path) => AppConfig::load_from(path).unwrap_or_else(|e| {
                tracing::warn!("Using default config: {:#}", e);
                AppConfig::default()
            }),
            None => AppConfig::default(),
        };
        Self::with_config(config, config_path)
    }

    pub fn with_config(config: AppConfig, config_path: Option<PathBuf>) -> Self {
        let file_tree = match config.last_folder {
            Some(ref path) => FileTree::from_path(path).unwrap_or_else(|e| {
                tracing::warn!("Could not reopen folder: {:#}", e);
                FileTree::default()
            }),
            None => FileTree::default(),
        };

        Self {
            file_tree,
            pages: Vec::new(),
            active: None,
            config,
            search: String::new(),
            sidebar_visible: true,
            status: None,
            settings_dialog: SettingsDialog::default(),
            config_path,
        }
    }

    fn save_config(&self) {
        let Some(ref path) = self.config_path else {
            return;
        };
        if let Err(e) = self.config.save_to(path) {
            tracing::warn!("Failed to save config: {:#}", e);
        }
    }

    /// Log an error and show it in the status bar
    pub fn report_error(&mut self, error: impl Display) {
        tracing::error!("{:#}", error);
        self.status = Some(format!("Error: {error:#}"));
    }

    fn report(&mut self, message: String) {
        tracing::info!("{}", message);
        self.status = Some(message);
    }

    /// Open a workspace folder
    pub fn open_folder(&mut self, path: PathBuf) {
        match FileTree::from_path(&path) {
            Ok(tree) => {
                self.file_tree = tree;
                self.config.last_folder = Some(path);
                self.save_config();
            }
            Err(e) => self.report_error(e),
        }
    }

    pub fn refresh_workspace(&mut self) {
        if let Err(e) = self.file_tree.refresh() {
            self.report_error(e);
        }
    }

    pub fn is_open(&self, path: &Path) -> bool {
        self.pages.iter().any(|p| p.path == path)
    }

    /// Open a document in a new tab, or focus its tab if already open
    pub fn open_document(&mut self, path: PathBuf) {
        if let Some(index) = self.pages.iter().position(|p| p.path == path) {
            self.active = Some(index);
            return;
        }

        match FileSession::open(&path, self.config.file) {
            Ok(page) => {
                self.pages.push(page);
                self.active = Some(self.pages.len() - 1);
                self.config.add_recent_file(path);
                self.save_config();
            }
            Err(e) => self.report_error(e),
        }
    }

    pub fn close_page(&mut self, index: usize) {
        if index >= self.pages.len() {
            return;
        }
        let page = self.pages.remove(index);
        if page.modified {
            tracing::warn!("Closed {} with unsaved changes", page.path.display());
        }

        self.active = match self.active {
            _ if self.pages.is_empty() => None,
            Some(active) if active > index => Some(active - 1),
            Some(active) => Some(active.min(self.pages.len() - 1)),
            None => None,
        };
    }

    pub fn save_page(&mut self, index: usize) {
        let Some(page) = self.pages.get_mut(index) else {
            return;
        };
        match page.save() {
            Ok(written) => self.report(format!("Saved {}", written.display())),
            Err(e) => self.report_error(e),
        }
    }

    pub fn process_page(&mut self, index: usize) {
        let Some(page) = self.pages.get_mut(index) else {
            return;
        };
        let report = page.process();
        let name = page.title();
        self.report(format!(
            "Processed {}: {} renamed, {} removed",
            name, report.renamed, report.removed
        ));
    }

    pub fn open_settings(&mut self, index: usize) {
        if let Some(page) = self.pages.get(index) {
            self.settings_dialog.open(page.path.clone(), page.settings);
        }
    }

    fn apply_settings(&mut self, ctx: &egui::Context) {
        if let Some((path, settings)) = self.settings_dialog.show(ctx) {
            if let Some(page) = self.pages.iter_mut().find(|p| p.path == path) {
                page.settings = settings;
                tracing::info!("Updated save settings for {}", path.display());
            }
        }
    }

    fn open_document_dialog(&mut self) {
        let mut dialog = rfd::FileDialog::new().add_filter("Documents", &["json"]);
        if let Some(ref folder) = self.config.last_folder {
            dialog = dialog.set_directory(folder);
        }
        if let Some(path) = dialog.pick_file() {
            self.open_document(path);
        }
    }

    /// Render the top menu bar
    fn render_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Document...").clicked() {
                        self.open_document_dialog();
                        ui.close();
                    }
                    if ui.button("Open Folder...").clicked() {
                        if let Some(path) = rfd::FileDialog::new().pick_folder() {
                            self.open_folder(path);
                        }
                        ui.close();
                    }
                    ui.menu_button("Recent", |ui| {
                        let recent = self.config.recent_files.clone();
                        if recent.is_empty() {
                            ui.label("Nothing yet");
                        }
                        for path in recent {
                            if ui.button(path.display().to_string()).clicked() {
                                self.open_document(path);
                                ui.close();
                            }
                        }
                    });
                    if ui.button("Save").clicked() {
                        if let Some(index) = self.active {
                            self.save_page(index);
                        }
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("View", |ui| {
                    if ui.button("Toggle Sidebar").clicked() {
                        self.sidebar_visible = !self.sidebar_visible;
                        ui.close();
                    }
                });
            });
        });
    }

    fn render_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| match self.status {
                Some(ref status) => {
                    ui.label(status);
                }
                None => {
                    ui.weak("Ready");
                }
            });
        });
    }
}

impl eframe::App for ConfpadApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let (save, toggle_sidebar) = ctx.input(|i| {
            (
                i.modifiers.ctrl && i.key_pressed(egui::Key::S),
                i.modifiers.ctrl && i.key_pressed(egui::Key::B),
            )
        });
        if save {
            if let Some(index) = self.active {
                self.save_page(index);
            }
        }
        if toggle_sidebar {
            self.sidebar_visible = !self.sidebar_visible;
        }

        self.render_menu_bar(ctx);
        self.render_status_bar(ctx);

        if self.sidebar_visible {
            egui::SidePanel::left("sidebar")
                .resizable(true)
                .default_width(self.config.ui.sidebar_width)
                .min_width(150.0)
                .show(ctx, |ui| {
                    FileTreePanel::show(ui, self);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            FilePagePanel::show(ui, self);
        });

        self.apply_settings(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const DOC: &str = r#"{
  "header": { "name": "Lobby", "dealer": "Acme AV", "programmer": "jdoe" },
  "objects": [
    { "id": "B1", "name": "Light ", "description": "Button", "type_code": "PB" },
    { "id": "B2", "name": "", "description": "Button", "type_code": "PB" }
  ]
}"#;

    fn app_with_docs(dir: &Path, names: &[&str]) -> ConfpadApp {
        for name in names {
            fs::write(dir.join(name), DOC).unwrap();
        }
        ConfpadApp::with_config(AppConfig::default(), None)
    }

    #[test]
    fn test_open_focuses_existing_tab() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_docs(dir.path(), &["a.json", "b.json"]);

        app.open_document(dir.path().join("a.json"));
        app.open_document(dir.path().join("b.json"));
        assert_eq!(app.active, Some(1));

        app.open_document(dir.path().join("a.json"));
        assert_eq!(app.pages.len(), 2);
        assert_eq!(app.active, Some(0));
        assert_eq!(app.config.recent_files[0], dir.path().join("b.json"));
    }

    #[test]
    fn test_open_folder_persists_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.json"), DOC).unwrap();
        let config_path = dir.path().join("config").join("config.json");
        let mut app = ConfpadApp::with_config(AppConfig::default(), Some(config_path.clone()));

        app.open_folder(dir.path().to_path_buf());
        assert_eq!(app.file_tree.documents, vec![dir.path().join("a.json")]);

        let saved = AppConfig::load_from(&config_path).unwrap();
        assert_eq!(saved.last_folder.as_deref(), Some(dir.path()));
    }

    #[test]
    fn test_open_missing_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_docs(dir.path(), &[]);

        app.open_document(dir.path().join("missing.json"));
        assert!(app.pages.is_empty());
        assert!(app.status.as_deref().unwrap().starts_with("Error"));
    }

    #[test]
    fn test_close_page_adjusts_active() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_docs(dir.path(), &["a.json", "b.json", "c.json"]);
        for name in ["a.json", "b.json", "c.json"] {
            app.open_document(dir.path().join(name));
        }

        app.close_page(0);
        assert_eq!(app.active, Some(1));
        app.close_page(1);
        assert_eq!(app.active, Some(0));
        app.close_page(0);
        assert_eq!(app.active, None);
    }

    #[test]
    fn test_process_and_save_page() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_docs(dir.path(), &["a.json"]);
        app.open_document(dir.path().join("a.json"));

        app.process_page(0);
        assert!(app.pages[0].modified);
        assert_eq!(app.pages[0].document.item_count(), 1);

        app.save_page(0);
        assert!(!app.pages[0].modified);
        // Default settings leave a.json alone and write a sibling
        assert!(dir.path().join("a_new.json").exists());
        assert_eq!(fs::read_to_string(dir.path().join("a.json")).unwrap(), DOC);
    }

    #[test]
    fn test_menu_bar_renders_headless() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_docs(dir.path(), &["a.json"]);
        app.open_document(dir.path().join("a.json"));

        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            app.render_menu_bar(ctx);
            app.render_status_bar(ctx);
        });
        assert_eq!(app.pages.len(), 1);
        assert!(app.sidebar_visible);
    }
}
