//! Opaque handles for tree nodes.
//!
//! A display surface cannot hold references into a [`Document`], so every
//! node crossing that boundary travels as a [`Handle`]. The registry mints one
//! handle per visible group and item when it is built and maps handles back to
//! nodes of the current document.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::model::{Document, Group, Item, ItemKey};

use super::error::TreeError;
use super::filter::TypeFilter;

static NEXT_REGISTRY: AtomicU64 = AtomicU64::new(1);

/// Opaque, copyable reference to a group or item.
///
/// Carries the id of the registry that minted it, so handles from an earlier
/// registry never alias nodes of a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle {
    registry: u64,
    slot: usize,
}

/// A group row
#[derive(Debug, Clone, Copy)]
pub struct GroupNode<'a> {
    pub type_code: &'a str,
    pub items: &'a [Item],
}

/// An item row
#[derive(Debug, Clone, Copy)]
pub struct ItemNode<'a> {
    pub item: &'a Item,
}

/// A node of the projected tree
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Group(GroupNode<'a>),
    Item(ItemNode<'a>),
}

impl<'a> Node<'a> {
    pub fn group(group: &'a Group) -> Self {
        Node::Group(GroupNode {
            type_code: group.type_code(),
            items: group.items(),
        })
    }

    pub fn item(item: &'a Item) -> Self {
        Node::Item(ItemNode { item })
    }

    fn describe(&self) -> String {
        match self {
            Node::Group(g) => g.type_code.to_string(),
            Node::Item(i) => format!("{}/{}", i.item.type_code, i.item.id),
        }
    }
}

/// Nodes compare by identity: group key, or item key. Two items with equal
/// fields are still different nodes.
impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Group(a), Node::Group(b)) => a.type_code == b.type_code,
            (Node::Item(a), Node::Item(b)) => a.item.key() == b.item.key(),
            _ => false,
        }
    }
}

impl Eq for Node<'_> {}

#[derive(Debug, Clone)]
enum Slot {
    Group(String),
    Item {
        key: ItemKey,
        type_code: String,
        index: usize,
    },
}

/// Bidirectional map between visible nodes and handles
#[derive(Debug)]
pub struct IdentityRegistry {
    id: u64,
    slots: Vec<Slot>,
    groups: HashMap<String, usize>,
    items: HashMap<ItemKey, usize>,
}

impl IdentityRegistry {
    /// Mint handles for every group and item the filter lets through
    pub fn build(doc: &Document, filter: &TypeFilter) -> Self {
        let mut registry = Self {
            id: NEXT_REGISTRY.fetch_add(1, Ordering::Relaxed),
            slots: Vec::with_capacity(doc.groups().len() + doc.item_count()),
            groups: HashMap::new(),
            items: HashMap::new(),
        };

        for group in doc.groups() {
            if !filter.is_visible(group.type_code()) {
                continue;
            }
            let slot = registry.push(Slot::Group(group.type_code().to_string()));
            registry.groups.insert(group.type_code().to_string(), slot);

            for (index, item) in group.items().iter().enumerate() {
                let slot = registry.push(Slot::Item {
                    key: item.key(),
                    type_code: group.type_code().to_string(),
                    index,
                });
                registry.items.insert(item.key(), slot);
            }
        }

        registry
    }

    fn push(&mut self, slot: Slot) -> usize {
        self.slots.push(slot);
        self.slots.len() - 1
    }

    fn handle(&self, slot: usize) -> Handle {
        Handle {
            registry: self.id,
            slot,
        }
    }

    /// Number of handles minted
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether `handle` came from this registry
    pub fn owns(&self, handle: Handle) -> bool {
        handle.registry == self.id && handle.slot < self.slots.len()
    }

    /// Handle for a node. Same node, same handle.
    pub fn to_handle(&self, node: &Node<'_>) -> Result<Handle, TreeError> {
        let slot = match node {
            Node::Group(g) => self.groups.get(g.type_code),
            Node::Item(i) => self.items.get(&i.item.key()),
        };
        slot.map(|&slot| self.handle(slot))
            .ok_or_else(|| TreeError::NotProjected(node.describe()))
    }

    pub fn group_handle(&self, type_code: &str) -> Option<Handle> {
        self.groups.get(type_code).map(|&slot| self.handle(slot))
    }

    pub fn item_handle(&self, key: ItemKey) -> Option<Handle> {
        self.items.get(&key).map(|&slot| self.handle(slot))
    }

    /// Resolve a handle against `doc`
    pub fn from_handle<'d>(&self, doc: &'d Document, handle: Handle) -> Result<Node<'d>, TreeError> {
        match self.slot(handle)? {
            Slot::Group(type_code) => doc
                .group(type_code)
                .map(Node::group)
                .ok_or(TreeError::InvalidHandle(handle)),
            Slot::Item {
                key,
                type_code,
                index,
            } => doc
                .item_at(type_code, *index)
                .filter(|item| item.key() == *key)
                .map(Node::item)
                .ok_or(TreeError::InvalidHandle(handle)),
        }
    }

    /// Where an item handle points: group key and position within the group
    pub(crate) fn item_location(&self, handle: Handle) -> Result<(&str, usize, ItemKey), TreeError> {
        match self.slot(handle)? {
            Slot::Item {
                key,
                type_code,
                index,
            } => Ok((type_code.as_str(), *index, *key)),
            Slot::Group(_) => Err(TreeError::InvalidHandle(handle)),
        }
    }

    fn slot(&self, handle: Handle) -> Result<&Slot, TreeError> {
        if handle.registry != self.id {
            return Err(TreeError::InvalidHandle(handle));
        }
        self.slots
            .get(handle.slot)
            .ok_or(TreeError::InvalidHandle(handle))
    }
}
