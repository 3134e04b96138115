//! Type codes hidden from the tree

use std::collections::BTreeSet;

/// System object types that mean nothing to an end user
pub const SYSTEM_TYPE_CODES: &[&str] = &[
    "Bk", "Bw", "CED", "Cm", "Cs", "Et", "EtU", "FP", "FSgntr", "SrU",
];

/// Set of type codes excluded from display
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeFilter {
    excluded: BTreeSet<String>,
}

impl TypeFilter {
    /// Hide the given type codes
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded: codes.into_iter().map(Into::into).collect(),
        }
    }

    /// Hide nothing
    pub fn none() -> Self {
        Self::default()
    }

    /// Hide the system object types
    pub fn system() -> Self {
        Self::new(SYSTEM_TYPE_CODES.iter().copied())
    }

    pub fn is_visible(&self, type_code: &str) -> bool {
        !self.excluded.contains(type_code)
    }

    pub fn excluded(&self) -> impl Iterator<Item = &str> {
        self.excluded.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_filter() {
        let filter = TypeFilter::system();
        for code in SYSTEM_TYPE_CODES {
            assert!(!filter.is_visible(code), "{code} should be hidden");
        }
        assert!(filter.is_visible("PB"));
        // Codes are case sensitive
        assert!(filter.is_visible("bk"));
    }

    #[test]
    fn test_none_hides_nothing() {
        let filter = TypeFilter::none();
        assert!(filter.is_visible("Bk"));
        assert_eq!(filter.excluded().count(), 0);
    }
}
