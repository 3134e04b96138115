//! Two-level tree view over a document: type groups, then objects.
//!
//! [`TreeProjection`] holds no reference to the document. Every query takes
//! the document it should answer for, and checks that it is the same
//! document, with the same structure, the projection was built from. After a structural change the
//! caller must [`rebuild`](TreeProjection::rebuild); queries fail with
//! [`TreeError::Stale`] until it does.

use crate::core::model::{Document, Version};

use super::error::TreeError;
use super::filter::TypeFilter;
use super::registry::{Handle, IdentityRegistry, Node};

/// Columns shown for every row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    /// Group description or object id
    Kind = 0,
    /// Object name
    Name = 1,
}

impl Column {
    pub const COUNT: usize = 2;

    pub fn title(self) -> &'static str {
        match self {
            Column::Kind => "Type",
            Column::Name => "Name",
        }
    }
}

impl TryFrom<usize> for Column {
    type Error = TreeError;

    fn try_from(col: usize) -> Result<Self, Self::Error> {
        match col {
            0 => Ok(Column::Kind),
            1 => Ok(Column::Name),
            _ => Err(TreeError::InvalidColumn(col)),
        }
    }
}

/// Value type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
}

/// Parent of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent {
    /// The implicit root
    Root,
    Group(Handle),
    /// The root itself, or an object whose type code matches no visible group
    None,
}

/// Styling signal for a row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresentationHint {
    /// Bold, accent coloured
    pub emphasized: bool,
}

/// The queries a tree display needs. `None` stands for the implicit root.
pub trait TreeModel {
    fn column_count(&self) -> usize;

    fn children(&self, parent: Option<Handle>) -> Result<Vec<Handle>, TreeError>;

    fn is_container(&self, node: Option<Handle>) -> Result<bool, TreeError>;

    fn parent(&self, node: Option<Handle>) -> Result<Parent, TreeError>;

    fn value(&self, node: Handle, col: usize) -> Result<String, TreeError>;

    fn is_editable(&self, node: Handle, col: usize) -> Result<bool, TreeError>;

    fn hint(&self, node: Handle) -> Result<PresentationHint, TreeError>;
}

/// Adapter from a [`Document`] to the [`TreeModel`] contract
#[derive(Debug)]
pub struct TreeProjection {
    filter: TypeFilter,
    registry: IdentityRegistry,
    version: Version,
}

impl TreeProjection {
    pub fn new(doc: &Document, filter: TypeFilter) -> Self {
        let registry = IdentityRegistry::build(doc, &filter);
        tracing::debug!(
            "Built projection of {} with {} handles",
            doc.version(),
            registry.len()
        );
        Self {
            filter,
            registry,
            version: doc.version(),
        }
    }

    /// Re-project after a structural change. Invalidates every handle
    /// handed out so far.
    pub fn rebuild(&mut self, doc: &Document) {
        self.registry = IdentityRegistry::build(doc, &self.filter);
        self.version = doc.version();
        tracing::debug!(
            "Rebuilt projection of {} with {} handles",
            self.version,
            self.registry.len()
        );
    }

    pub fn filter(&self) -> &TypeFilter {
        &self.filter
    }

    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    /// Whether the projection still matches `doc`
    pub fn is_current(&self, doc: &Document) -> bool {
        doc.version() == self.version
    }

    fn check(&self, doc: &Document) -> Result<(), TreeError> {
        if self.is_current(doc) {
            Ok(())
        } else {
            Err(TreeError::Stale {
                built: self.version,
                current: doc.version(),
            })
        }
    }

    pub fn column_count(&self) -> usize {
        Column::COUNT
    }

    pub fn column_type(&self, col: usize) -> Result<ColumnType, TreeError> {
        Column::try_from(col).map(|_| ColumnType::Text)
    }

    pub fn to_handle(&self, doc: &Document, node: &Node<'_>) -> Result<Handle, TreeError> {
        self.check(doc)?;
        self.registry.to_handle(node)
    }

    pub fn from_handle<'d>(&self, doc: &'d Document, handle: Handle) -> Result<Node<'d>, TreeError> {
        self.check(doc)?;
        self.registry.from_handle(doc, handle)
    }

    /// Children of `parent` plus their count
    pub fn children_of(
        &self,
        doc: &Document,
        parent: Option<Handle>,
    ) -> Result<(Vec<Handle>, usize), TreeError> {
        self.check(doc)?;

        let children: Vec<Handle> = match parent {
            None => doc
                .groups()
                .iter()
                .filter(|g| self.filter.is_visible(g.type_code()))
                .map(|g| self.registry.to_handle(&Node::group(g)))
                .collect::<Result<_, _>>()?,
            Some(handle) => match self.registry.from_handle(doc, handle)? {
                Node::Group(group) => group
                    .items
                    .iter()
                    .map(|item| self.registry.to_handle(&Node::item(item)))
                    .collect::<Result<_, _>>()?,
                Node::Item(_) => Vec::new(),
            },
        };

        let count = children.len();
        Ok((children, count))
    }

    pub fn is_container(&self, doc: &Document, node: Option<Handle>) -> Result<bool, TreeError> {
        self.check(doc)?;
        match node {
            None => Ok(true),
            Some(handle) => Ok(matches!(
                self.registry.from_handle(doc, handle)?,
                Node::Group(_)
            )),
        }
    }

    /// Parent of `node`. An object's parent is found by matching its type
    /// code against the visible groups; it is not stored anywhere.
    pub fn parent_of(&self, doc: &Document, node: Option<Handle>) -> Result<Parent, TreeError> {
        self.check(doc)?;
        let Some(handle) = node else {
            return Ok(Parent::None);
        };

        match self.registry.from_handle(doc, handle)? {
            Node::Group(_) => Ok(Parent::Root),
            Node::Item(node) => {
                let parent = doc
                    .groups()
                    .iter()
                    .filter(|g| self.filter.is_visible(g.type_code()))
                    .find(|g| g.type_code() == node.item.type_code)
                    .and_then(|g| self.registry.group_handle(g.type_code()));

                match parent {
                    Some(group) => Ok(Parent::Group(group)),
                    None => {
                        tracing::warn!(
                            "Object '{}' has type code '{}' with no visible group",
                            node.item.id,
                            node.item.type_code
                        );
                        Ok(Parent::None)
                    }
                }
            }
        }
    }

    pub fn get_value(&self, doc: &Document, handle: Handle, col: usize) -> Result<String, TreeError> {
        self.check(doc)?;
        let column = Column::try_from(col)?;

        match (self.registry.from_handle(doc, handle)?, column) {
            (Node::Group(group), Column::Kind) => match group.items.first() {
                Some(first) => Ok(first.description.clone()),
                None => {
                    tracing::error!("Group '{}' is projected but empty", group.type_code);
                    Err(TreeError::EmptyGroup(group.type_code.to_string()))
                }
            },
            (Node::Group(_), Column::Name) => Ok(String::new()),
            (Node::Item(node), Column::Kind) => Ok(node.item.id.clone()),
            (Node::Item(node), Column::Name) => Ok(node.item.name.clone()),
        }
    }

    pub fn is_editable(&self, doc: &Document, handle: Handle, col: usize) -> Result<bool, TreeError> {
        self.check(doc)?;
        let column = Column::try_from(col)?;
        let node = self.registry.from_handle(doc, handle)?;
        Ok(matches!((node, column), (Node::Item(_), Column::Name)))
    }

    /// Rename an object in place. Only the name column of an object row is
    /// writable. Nothing is persisted.
    pub fn set_value(
        &self,
        doc: &mut Document,
        handle: Handle,
        col: usize,
        text: &str,
    ) -> Result<(), TreeError> {
        if !self.is_editable(doc, handle, col)? {
            return Err(TreeError::ReadOnly { handle, column: col });
        }

        let (type_code, index, key) = self.registry.item_location(handle)?;
        let item = doc
            .item_at_mut(type_code, index)
            .filter(|item| item.key() == key)
            .ok_or(TreeError::InvalidHandle(handle))?;

        if item.name != text {
            tracing::debug!("Renamed '{}' from '{}' to '{}'", item.id, item.name, text);
            item.name = text.to_string();
        }
        Ok(())
    }

    pub fn presentation_hint(
        &self,
        doc: &Document,
        handle: Handle,
    ) -> Result<PresentationHint, TreeError> {
        self.check(doc)?;
        let emphasized = matches!(self.registry.from_handle(doc, handle)?, Node::Group(_));
        Ok(PresentationHint { emphasized })
    }

    /// Pair the projection with a document for read-only [`TreeModel`] use
    pub fn view<'a>(&'a self, doc: &'a Document) -> ProjectionView<'a> {
        ProjectionView {
            projection: self,
            doc,
        }
    }
}

/// A projection bound to the document it answers for
#[derive(Debug, Clone, Copy)]
pub struct ProjectionView<'a> {
    projection: &'a TreeProjection,
    doc: &'a Document,
}

impl TreeModel for ProjectionView<'_> {
    fn column_count(&self) -> usize {
        self.projection.column_count()
    }

    fn children(&self, parent: Option<Handle>) -> Result<Vec<Handle>, TreeError> {
        self.projection
            .children_of(self.doc, parent)
            .map(|(children, _)| children)
    }

    fn is_container(&self, node: Option<Handle>) -> Result<bool, TreeError> {
        self.projection.is_container(self.doc, node)
    }

    fn parent(&self, node: Option<Handle>) -> Result<Parent, TreeError> {
        self.projection.parent_of(self.doc, node)
    }

    fn value(&self, node: Handle, col: usize) -> Result<String, TreeError> {
        self.projection.get_value(self.doc, node, col)
    }

    fn is_editable(&self, node: Handle, col: usize) -> Result<bool, TreeError> {
        self.projection.is_editable(self.doc, node, col)
    }

    fn hint(&self, node: Handle) -> Result<PresentationHint, TreeError> {
        self.projection.presentation_hint(self.doc, node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Header, Item};
    use crate::core::process::{Cleanup, Processor};

    fn sample() -> Document {
        Document::from_items(
            Header::new("Lobby", "Acme AV", "jdoe"),
            vec![
                Item::new("B1", "Light", "Button", "PB"),
                Item::new("S1", "Zone", "Switch", "Sw"),
                Item::new("K1", "Sys", "Block", "Bk"),
                Item::new("B2", "Shade", "Button", "PB"),
                Item::new("F1", "Panel", "Front panel", "FP"),
            ],
        )
    }

    fn all_handles(projection: &TreeProjection, doc: &Document) -> Vec<Handle> {
        let (groups, _) = projection.children_of(doc, None).unwrap();
        let mut handles = groups.clone();
        for group in groups {
            handles.extend(projection.children_of(doc, Some(group)).unwrap().0);
        }
        handles
    }

    #[test]
    fn test_single_group_document() {
        let doc = Document::from_items(
            Header::default(),
            vec![Item::new("B1", "Light", "Push button", "PB")],
        );
        let projection = TreeProjection::new(&doc, TypeFilter::none());

        let (roots, count) = projection.children_of(&doc, None).unwrap();
        assert_eq!(count, 1);
        assert_eq!(projection.get_value(&doc, roots[0], 0).unwrap(), "Push button");
        assert_eq!(projection.get_value(&doc, roots[0], 1).unwrap(), "");

        let (items, count) = projection.children_of(&doc, Some(roots[0])).unwrap();
        assert_eq!(count, 1);
        assert_eq!(projection.get_value(&doc, items[0], 0).unwrap(), "B1");
        assert_eq!(projection.get_value(&doc, items[0], 1).unwrap(), "Light");
    }

    #[test]
    fn test_system_groups_are_hidden() {
        let doc = Document::from_items(
            Header::default(),
            vec![
                Item::new("K1", "Sys", "Block", "Bk"),
                Item::new("B1", "Light", "Button", "PB"),
            ],
        );
        let projection = TreeProjection::new(&doc, TypeFilter::system());

        let (roots, count) = projection.children_of(&doc, None).unwrap();
        assert_eq!(count, 1);
        match projection.from_handle(&doc, roots[0]).unwrap() {
            Node::Group(group) => assert_eq!(group.type_code, "PB"),
            Node::Item(_) => panic!("root child should be a group"),
        }
    }

    #[test]
    fn test_no_hidden_type_reachable() {
        let doc = sample();
        let projection = TreeProjection::new(&doc, TypeFilter::system());

        for handle in all_handles(&projection, &doc) {
            let code = match projection.from_handle(&doc, handle).unwrap() {
                Node::Group(g) => g.type_code.to_string(),
                Node::Item(i) => i.item.type_code.clone(),
            };
            assert!(projection.filter().is_visible(&code), "{code} leaked");
        }
    }

    #[test]
    fn test_children_match_group_key() {
        let doc = sample();
        let projection = TreeProjection::new(&doc, TypeFilter::system());

        let (groups, _) = projection.children_of(&doc, None).unwrap();
        assert_eq!(groups.len(), 2);
        for group in groups {
            let Node::Group(node) = projection.from_handle(&doc, group).unwrap() else {
                panic!("expected group");
            };
            for child in projection.children_of(&doc, Some(group)).unwrap().0 {
                let Node::Item(item) = projection.from_handle(&doc, child).unwrap() else {
                    panic!("expected item");
                };
                assert_eq!(item.item.type_code, node.type_code);
                assert_eq!(
                    projection.parent_of(&doc, Some(child)).unwrap(),
                    Parent::Group(group)
                );
            }
        }
    }

    #[test]
    fn test_group_parent_is_root() {
        let doc = sample();
        let projection = TreeProjection::new(&doc, TypeFilter::system());

        for group in projection.children_of(&doc, None).unwrap().0 {
            assert_eq!(projection.parent_of(&doc, Some(group)).unwrap(), Parent::Root);
        }
        assert_eq!(projection.parent_of(&doc, None).unwrap(), Parent::None);
    }

    #[test]
    fn test_items_are_leaves() {
        let doc = sample();
        let projection = TreeProjection::new(&doc, TypeFilter::system());
        assert!(projection.is_container(&doc, None).unwrap());

        for handle in all_handles(&projection, &doc) {
            let is_group = matches!(projection.from_handle(&doc, handle).unwrap(), Node::Group(_));
            let (children, count) = projection.children_of(&doc, Some(handle)).unwrap();
            assert_eq!(projection.is_container(&doc, Some(handle)).unwrap(), is_group);
            assert_eq!(
                projection.presentation_hint(&doc, handle).unwrap().emphasized,
                is_group
            );
            if !is_group {
                assert!(children.is_empty());
                assert_eq!(count, 0);
            }
        }
    }

    #[test]
    fn test_handle_round_trip() {
        let doc = sample();
        let projection = TreeProjection::new(&doc, TypeFilter::system());

        for item in doc.group("PB").unwrap().items() {
            let node = Node::item(item);
            let handle = projection.to_handle(&doc, &node).unwrap();
            assert_eq!(projection.to_handle(&doc, &node).unwrap(), handle);
            assert_eq!(projection.from_handle(&doc, handle).unwrap(), node);
        }
    }

    #[test]
    fn test_columns() {
        let doc = sample();
        let projection = TreeProjection::new(&doc, TypeFilter::none());
        assert_eq!(projection.column_count(), 2);
        assert_eq!(projection.column_type(1).unwrap(), ColumnType::Text);
        assert_eq!(projection.column_type(2), Err(TreeError::InvalidColumn(2)));

        let group = projection.registry().group_handle("PB").unwrap();
        assert_eq!(
            projection.get_value(&doc, group, 5),
            Err(TreeError::InvalidColumn(5))
        );
    }

    #[test]
    fn test_rename_through_name_column() {
        let mut doc = sample();
        let projection = TreeProjection::new(&doc, TypeFilter::system());
        let group = projection.registry().group_handle("PB").unwrap();
        let item = projection.children_of(&doc, Some(group)).unwrap().0[1];

        projection.set_value(&mut doc, item, 1, "Blinds").unwrap();
        assert_eq!(projection.get_value(&doc, item, 1).unwrap(), "Blinds");
        assert_eq!(doc.item_at("PB", 1).unwrap().name, "Blinds");
        // Renames keep the projection current
        assert!(projection.is_current(&doc));

        assert_eq!(
            projection.set_value(&mut doc, item, 0, "X"),
            Err(TreeError::ReadOnly { handle: item, column: 0 })
        );
        assert_eq!(
            projection.set_value(&mut doc, group, 1, "X"),
            Err(TreeError::ReadOnly { handle: group, column: 1 })
        );
    }

    #[test]
    fn test_stale_handle_after_process() {
        let mut doc = sample();
        doc.for_each_name(|name| {
            if name == "Shade" {
                name.clear();
            }
        });
        let mut projection = TreeProjection::new(&doc, TypeFilter::system());
        let key = doc.group("PB").unwrap().items()[1].key();
        let stale = projection.registry().item_handle(key).unwrap();

        let report = Cleanup.process(&mut doc);
        assert_eq!(report.removed, 1);

        assert!(matches!(
            projection.children_of(&doc, None),
            Err(TreeError::Stale { .. })
        ));

        projection.rebuild(&doc);
        assert_eq!(
            projection.from_handle(&doc, stale).unwrap_err(),
            TreeError::InvalidHandle(stale)
        );
        assert_eq!(projection.children_of(&doc, None).unwrap().1, 2);
    }

    #[test]
    fn test_other_document_is_stale() {
        let doc = Document::from_items(
            Header::default(),
            vec![Item::new("B1", "Light", "", "PB")],
        );
        let other = Document::from_items(
            Header::default(),
            vec![Item::new("X9", "Other", "", "PB")],
        );
        let mut projection = TreeProjection::new(&doc, TypeFilter::none());
        let group = projection.registry().group_handle("PB").unwrap();
        let item = projection.children_of(&doc, Some(group)).unwrap().0[0];

        // Same revision and same item keys, but not the same document
        assert_eq!(doc.revision(), other.revision());
        assert!(!projection.is_current(&other));
        assert!(matches!(
            projection.get_value(&other, item, 1),
            Err(TreeError::Stale { .. })
        ));
        assert!(matches!(
            projection.from_handle(&other, item),
            Err(TreeError::Stale { .. })
        ));

        let copy = doc.clone();
        assert!(matches!(
            projection.children_of(&copy, None),
            Err(TreeError::Stale { .. })
        ));

        projection.rebuild(&other);
        assert_eq!(
            projection.get_value(&other, item, 1),
            Err(TreeError::InvalidHandle(item))
        );
        let fresh = projection.children_of(&other, Some(group));
        assert_eq!(fresh, Err(TreeError::InvalidHandle(group)));
        let group = projection.registry().group_handle("PB").unwrap();
        let item = projection.children_of(&other, Some(group)).unwrap().0[0];
        assert_eq!(projection.get_value(&other, item, 1).unwrap(), "Other");
    }

    #[test]
    fn test_view_parents_resolve() {
        let doc = sample();
        let projection = TreeProjection::new(&doc, TypeFilter::system());
        let view = projection.view(&doc);

        // Every visible item resolves to a visible parent
        for group in view.children(None).unwrap() {
            for item in view.children(Some(group)).unwrap() {
                assert_ne!(view.parent(Some(item)).unwrap(), Parent::None);
            }
        }
    }

    #[test]
    fn test_view_matches_projection() {
        let doc = sample();
        let projection = TreeProjection::new(&doc, TypeFilter::system());
        let view = projection.view(&doc);

        assert_eq!(view.column_count(), 2);
        let roots = view.children(None).unwrap();
        assert_eq!(roots, projection.children_of(&doc, None).unwrap().0);
        assert!(view.is_container(Some(roots[0])).unwrap());
        assert!(!view.is_editable(roots[0], 1).unwrap());
        assert!(view.hint(roots[0]).unwrap().emphasized);
        assert_eq!(view.value(roots[0], 0).unwrap(), "Button");
    }
}
