//! String membership set used by the method and scheme filters.

use std::collections::HashSet;

/// A set of strings with constant-time insertion and lookup.
///
/// Equality is case-sensitive; callers that need case-insensitive
/// membership normalize before inserting and before querying.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Set {
    items: HashSet<String>,
}

impl Set {
    /// Create a set holding every item yielded by `items`.
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        for item in items {
            set.add(item);
        }
        set
    }

    pub fn add(&mut self, item: impl Into<String>) {
        self.items.insert(item.into());
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items.contains(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Set {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_contains() {
        let mut set = Set::default();
        set.add("GET");
        assert!(set.contains("GET"));
        assert!(!set.contains("POST"));
    }

    #[test]
    fn test_case_sensitive() {
        let set = Set::new(["GET"]);
        assert!(!set.contains("get"));
    }

    #[test]
    fn test_duplicates_collapse() {
        let set: Set = ["https", "https", "http"].into_iter().collect();
        assert_eq!(set.len(), 2);
    }
}
