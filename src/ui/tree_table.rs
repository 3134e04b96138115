//! Two-column tree table driven by a [`TreeModel`]

use std::collections::HashSet;

use eframe::egui;
use egui::Color32;
use egui_extras::{Column as TableColumn, TableBuilder};

use confpad::core::config::UiConfig;
use confpad::tree::{Column, Handle, PresentationHint, TreeError, TreeModel};

const ROW_HEIGHT: f32 = 20.0;
const INDENT: f32 = 16.0;
const ACCENT: Color32 = Color32::from_rgb(90, 150, 255);

/// One visible line of the table
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub handle: Handle,
    pub depth: usize,
    pub container: bool,
    pub kind: String,
    pub name: String,
    pub editable: bool,
    pub hint: PresentationHint,
}

/// Walk the model from the root, descending only into expanded containers
pub fn flatten(model: &impl TreeModel, expanded: &HashSet<Handle>) -> Result<Vec<Row>, TreeError> {
    let mut rows = Vec::new();
    push_children(model, None, 0, expanded, &mut rows)?;
    Ok(rows)
}

fn push_children(
    model: &impl TreeModel,
    parent: Option<Handle>,
    depth: usize,
    expanded: &HashSet<Handle>,
    rows: &mut Vec<Row>,
) -> Result<(), TreeError> {
    for handle in model.children(parent)? {
        let container = model.is_container(Some(handle))?;
        rows.push(Row {
            handle,
            depth,
            container,
            kind: model.value(handle, Column::Kind as usize)?,
            name: model.value(handle, Column::Name as usize)?,
            editable: model.is_editable(handle, Column::Name as usize)?,
            hint: model.hint(handle)?,
        });

        if container && expanded.contains(&handle) {
            push_children(model, Some(handle), depth + 1, expanded, rows)?;
        }
    }
    Ok(())
}

/// What the user did to the table this frame
#[derive(Debug, Default)]
pub struct TableActions {
    pub toggled: Vec<Handle>,
    pub renamed: Vec<(Handle, String)>,
}

/// Tree table widget
pub struct TreeTable;

impl TreeTable {
    pub fn show(
        ui: &mut egui::Ui,
        rows: &[Row],
        expanded: &HashSet<Handle>,
        config: &UiConfig,
    ) -> TableActions {
        let mut actions = TableActions::default();

        TableBuilder::new(ui)
            .id_salt("tree_table")
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(TableColumn::initial(config.type_column_width).at_least(40.0))
            .column(
                TableColumn::initial(config.name_column_width)
                    .at_least(80.0)
                    .clip(true),
            )
            .header(ROW_HEIGHT, |mut header| {
                header.col(|ui| {
                    ui.strong(Column::Kind.title());
                });
                header.col(|ui| {
                    ui.strong(Column::Name.title());
                });
            })
            .body(|mut body| {
                for row in rows {
                    body.row(ROW_HEIGHT, |mut table_row| {
                        table_row.col(|ui| {
                            Self::show_kind(ui, row, expanded, &mut actions);
                        });
                        table_row.col(|ui| {
                            Self::show_name(ui, row, &mut actions);
                        });
                    });
                }
            });

        actions
    }

    fn styled(text: &str, hint: PresentationHint) -> egui::RichText {
        let text = egui::RichText::new(text);
        if hint.emphasized {
            text.strong().color(ACCENT)
        } else {
            text
        }
    }

    fn show_kind(
        ui: &mut egui::Ui,
        row: &Row,
        expanded: &HashSet<Handle>,
        actions: &mut TableActions,
    ) {
        ui.add_space(row.depth as f32 * INDENT);

        if row.container {
            let icon = if expanded.contains(&row.handle) {
                "\u{25BE}"
            } else {
                "\u{25B8}"
            };
            let label = format!("{} {}", icon, row.kind);
            if ui
                .selectable_label(false, Self::styled(&label, row.hint))
                .clicked()
            {
                actions.toggled.push(row.handle);
            }
        } else {
            ui.label(Self::styled(&row.kind, row.hint));
        }
    }

    fn show_name(ui: &mut egui::Ui, row: &Row, actions: &mut TableActions) {
        if !row.editable {
            ui.label(Self::styled(&row.name, row.hint));
            return;
        }

        let mut name = row.name.clone();
        let response = ui.add(
            egui::TextEdit::singleline(&mut name)
                .id_salt(row.handle)
                .desired_width(f32::INFINITY)
                .frame(false),
        );
        if response.changed() {
            actions.renamed.push((row.handle, name));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confpad::core::model::{Document, Header, Item};
    use confpad::tree::{TreeProjection, TypeFilter};

    fn projection() -> (Document, TreeProjection) {
        let doc = Document::from_items(
            Header::default(),
            vec![
                Item::new("B1", "Light", "Button", "PB"),
                Item::new("B2", "Shade", "Button", "PB"),
                Item::new("S1", "Zone", "Switch", "Sw"),
            ],
        );
        let projection = TreeProjection::new(&doc, TypeFilter::none());
        (doc, projection)
    }

    #[test]
    fn test_flatten_collapsed() {
        let (doc, projection) = projection();
        let rows = flatten(&projection.view(&doc), &HashSet::new()).unwrap();

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.container && r.depth == 0));
        assert!(rows.iter().all(|r| r.hint.emphasized && !r.editable));
        assert_eq!(rows[0].kind, "Button");
        assert_eq!(rows[1].kind, "Switch");
    }

    #[test]
    fn test_flatten_expanded_group() {
        let (doc, projection) = projection();
        let group = projection.registry().group_handle("PB").unwrap();
        let expanded = HashSet::from([group]);

        let rows = flatten(&projection.view(&doc), &expanded).unwrap();
        let summary: Vec<_> = rows
            .iter()
            .map(|r| (r.depth, r.kind.as_str(), r.name.as_str(), r.editable))
            .collect();
        assert_eq!(
            summary,
            vec![
                (0, "Button", "", false),
                (1, "B1", "Light", true),
                (1, "B2", "Shade", true),
                (0, "Switch", "", false),
            ]
        );
    }

    #[test]
    fn test_flatten_stale_projection_fails() {
        let (mut doc, projection) = projection();
        doc.push(Item::new("B3", "Fan", "Button", "PB"));
        assert!(matches!(
            flatten(&projection.view(&doc), &HashSet::new()),
            Err(TreeError::Stale { .. })
        ));
    }

    #[test]
    fn test_group_rows_are_accented() {
        let group = egui::RichText::new("Button");
        assert_eq!(
            TreeTable::styled("Button", PresentationHint { emphasized: true }),
            group.strong().color(ACCENT)
        );
        assert_eq!(
            TreeTable::styled("B1", PresentationHint::default()),
            egui::RichText::new("B1")
        );
    }

    #[test]
    fn test_show_without_input_reports_nothing() {
        let (doc, projection) = projection();
        let group = projection.registry().group_handle("PB").unwrap();
        let expanded = HashSet::from([group]);
        let rows = flatten(&projection.view(&doc), &expanded).unwrap();

        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                let actions = TreeTable::show(ui, &rows, &expanded, &UiConfig::default());
                assert!(actions.toggled.is_empty());
                assert!(actions.renamed.is_empty());
            });
        });
    }
}
