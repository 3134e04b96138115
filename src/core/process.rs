//! Document processing passes

use super::model::Document;

/// Outcome of a processing pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessReport {
    /// Objects whose name was changed
    pub renamed: usize,
    /// Objects removed from the document
    pub removed: usize,
}

impl ProcessReport {
    /// Whether the pass changed anything
    pub fn is_noop(&self) -> bool {
        self.renamed == 0 && self.removed == 0
    }

    /// Whether items or groups were added or removed
    pub fn is_structural(&self) -> bool {
        self.removed > 0
    }
}

/// A transformation applied to a document in place
pub trait Processor {
    /// Processor name, for logs
    fn name(&self) -> &str;

    /// Transform the document
    fn process(&self, doc: &mut Document) -> ProcessReport;
}

/// Trims object names and drops objects left without a name
#[derive(Debug, Clone, Copy, Default)]
pub struct Cleanup;

impl Processor for Cleanup {
    fn name(&self) -> &str {
        "cleanup"
    }

    fn process(&self, doc: &mut Document) -> ProcessReport {
        let mut renamed = 0;
        doc.for_each_name(|name| {
            let trimmed = name.trim();
            if trimmed.len() != name.len() {
                *name = trimmed.to_string();
                renamed += 1;
            }
        });

        let removed = doc.retain(|item| !item.name.is_empty());

        ProcessReport { renamed, removed }
    }
}

/// Run a processor and log what it did
pub fn process(doc: &mut Document, processor: &dyn Processor) -> ProcessReport {
    let report = processor.process(doc);
    tracing::info!(
        "Processor '{}' renamed {} and removed {} objects",
        processor.name(),
        report.renamed,
        report.removed
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Header, Item};

    #[test]
    fn test_cleanup_trims_and_removes() {
        let mut doc = Document::from_items(
            Header::default(),
            vec![
                Item::new("B1", "  Light", "Button", "PB"),
                Item::new("B2", "   ", "Button", "PB"),
                Item::new("S1", "", "Switch", "Sw"),
                Item::new("S2", "Zone", "Switch", "Sw"),
            ],
        );

        let report = process(&mut doc, &Cleanup);

        assert_eq!(report, ProcessReport { renamed: 2, removed: 2 });
        assert!(report.is_structural());
        assert_eq!(doc.item_count(), 2);
        assert_eq!(doc.item_at("PB", 0).unwrap().name, "Light");
        assert_eq!(doc.revision(), 1);
    }

    #[test]
    fn test_cleanup_drops_emptied_group() {
        let mut doc = Document::from_items(
            Header::default(),
            vec![
                Item::new("B1", "", "Button", "PB"),
                Item::new("S1", "Zone", "Switch", "Sw"),
            ],
        );

        Cleanup.process(&mut doc);
        assert!(doc.group("PB").is_none());
        assert_eq!(doc.groups().len(), 1);
    }

    #[test]
    fn test_cleanup_noop_keeps_revision() {
        let mut doc =
            Document::from_items(Header::default(), vec![Item::new("B1", "Light", "", "PB")]);
        let report = Cleanup.process(&mut doc);
        assert!(report.is_noop());
        assert_eq!(doc.revision(), 0);
    }
}
