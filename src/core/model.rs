//! Configuration document model: header, typed objects and their groups

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

static NEXT_DOCUMENT: AtomicU64 = AtomicU64::new(1);

/// Errors raised while building or persisting a document
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Load {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed document {path}: {source}")]
    Parse {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to save {path}: {source}")]
    Save {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("object '{id}' has type code '{found}' but sits in group '{group}'")]
    TypeCodeMismatch {
        id: String,
        found: String,
        group: String,
    },

    #[error("group '{0}' appears more than once")]
    DuplicateGroup(String),
}

/// Program header. Set once at load time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub dealer: String,
    #[serde(default)]
    pub programmer: String,
}

impl Header {
    pub fn new(
        name: impl Into<String>,
        dealer: impl Into<String>,
        programmer: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            dealer: dealer.into(),
            programmer: programmer.into(),
        }
    }

    /// Text shown in the header panel of a file page
    pub fn summary(&self) -> String {
        format!(
            "Program name: {}\nDealer: {}\nProgrammer: {}",
            self.name, self.dealer, self.programmer
        )
    }
}

/// In-memory identity of an item, unique within its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ItemKey(u64);

/// A single configured object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Type-specific display code
    pub id: String,
    /// User-editable name
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Key of the group this item belongs to
    pub type_code: String,
    #[serde(skip)]
    key: ItemKey,
}

impl Item {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        type_code: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            type_code: type_code.into(),
            key: ItemKey::default(),
        }
    }

    pub fn key(&self) -> ItemKey {
        self.key
    }
}

/// All objects sharing one type code, in document order
#[derive(Debug, Clone)]
pub struct Group {
    type_code: String,
    items: Vec<Item>,
}

impl Group {
    pub fn type_code(&self) -> &str {
        &self.type_code
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Process-unique identity of a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(u64);

impl DocumentId {
    fn next() -> Self {
        Self(NEXT_DOCUMENT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Which document, and which of its structures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Version {
    pub document: DocumentId,
    pub revision: u64,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "document {} at revision {}", self.document.0, self.revision)
    }
}

/// A parsed configuration document.
///
/// Groups keep the order in which their type code first appeared. A group
/// exists only while it holds at least one item, and every item's
/// `type_code` equals the key of the group that owns it.
///
/// `revision` counts structural changes (items or groups added, removed or
/// reordered). Renaming an item leaves it untouched.
///
/// Every document, clones included, gets its own [`DocumentId`].
#[derive(Debug)]
pub struct Document {
    id: DocumentId,
    header: Header,
    groups: Vec<Group>,
    next_key: u64,
    revision: u64,
}

impl Document {
    /// Create an empty document
    pub fn new(header: Header) -> Self {
        Self {
            id: DocumentId::next(),
            header,
            groups: Vec::new(),
            next_key: 0,
            revision: 0,
        }
    }

    /// Build a document from a flat object list, grouping by type code
    pub fn from_items(header: Header, items: impl IntoIterator<Item = Item>) -> Self {
        let mut doc = Self::new(header);
        for item in items {
            doc.push(item);
        }
        doc.revision = 0;
        doc
    }

    /// Build a document from pre-grouped objects, checking the type code invariant
    pub fn from_groups(
        header: Header,
        groups: impl IntoIterator<Item = (String, Vec<Item>)>,
    ) -> Result<Self, DocumentError> {
        let mut doc = Self::new(header);
        for (type_code, items) in groups {
            if doc.group(&type_code).is_some() {
                return Err(DocumentError::DuplicateGroup(type_code));
            }
            if let Some(bad) = items.iter().find(|item| item.type_code != type_code) {
                return Err(DocumentError::TypeCodeMismatch {
                    id: bad.id.clone(),
                    found: bad.type_code.clone(),
                    group: type_code,
                });
            }
            for item in items {
                doc.push(item);
            }
        }
        doc.revision = 0;
        Ok(doc)
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, type_code: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.type_code == type_code)
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn version(&self) -> Version {
        Version {
            document: self.id,
            revision: self.revision,
        }
    }

    /// Total number of objects across all groups
    pub fn item_count(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    /// Iterate over every object in document order
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.groups.iter().flat_map(|g| g.items.iter())
    }

    /// Append an object to the group named by its type code, creating the
    /// group if needed. Returns the identity minted for it.
    pub fn push(&mut self, mut item: Item) -> ItemKey {
        self.next_key += 1;
        item.key = ItemKey(self.next_key);
        let key = item.key;

        match self.groups.iter_mut().find(|g| g.type_code == item.type_code) {
            Some(group) => group.items.push(item),
            None => self.groups.push(Group {
                type_code: item.type_code.clone(),
                items: vec![item],
            }),
        }
        self.revision += 1;
        key
    }

    /// Look up an object by identity
    pub fn find(&self, key: ItemKey) -> Option<&Item> {
        self.items().find(|item| item.key == key)
    }

    /// Item at `index` of group `type_code`
    pub fn item_at(&self, type_code: &str, index: usize) -> Option<&Item> {
        self.group(type_code).and_then(|g| g.items.get(index))
    }

    pub(crate) fn item_at_mut(&mut self, type_code: &str, index: usize) -> Option<&mut Item> {
        self.groups
            .iter_mut()
            .find(|g| g.type_code == type_code)
            .and_then(|g| g.items.get_mut(index))
    }

    /// Apply `f` to every object's name. Does not count as a structural change.
    pub fn for_each_name(&mut self, mut f: impl FnMut(&mut String)) {
        for group in &mut self.groups {
            for item in &mut group.items {
                f(&mut item.name);
            }
        }
    }

    /// Drop every object for which `keep` returns false, and any group left
    /// empty. Returns how many objects were removed.
    pub fn retain(&mut self, mut keep: impl FnMut(&Item) -> bool) -> usize {
        let before = self.item_count();
        for group in &mut self.groups {
            group.items.retain(|item| keep(item));
        }
        self.groups.retain(|g| !g.items.is_empty());

        let removed = before - self.item_count();
        if removed > 0 {
            self.revision += 1;
        }
        removed
    }

    /// Remove one object by identity
    pub fn remove(&mut self, key: ItemKey) -> Option<Item> {
        let (gi, ii) = self.groups.iter().enumerate().find_map(|(gi, g)| {
            g.items
                .iter()
                .position(|item| item.key == key)
                .map(|ii| (gi, ii))
        })?;

        let item = self.groups[gi].items.remove(ii);
        if self.groups[gi].items.is_empty() {
            self.groups.remove(gi);
        }
        self.revision += 1;
        Some(item)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Header::default())
    }
}

impl Clone for Document {
    fn clone(&self) -> Self {
        Self {
            id: DocumentId::next(),
            header: self.header.clone(),
            groups: self.groups.clone(),
            next_key: self.next_key,
            revision: self.revision,
        }
    }
}
