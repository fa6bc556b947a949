//! Insertion Order Module
//!
//! Tracks the order in which keys were inserted, for FIFO eviction.

use std::collections::VecDeque;

// == Insertion Order ==
/// Tracks insertion order for oldest-first eviction.
///
/// Keys are stored in a VecDeque where:
/// - Front = Oldest insertion
/// - Back = Newest insertion
///
/// Reads never reorder keys; only re-inserting a key moves it to the back.
#[derive(Debug, Default, Clone)]
pub struct InsertionOrder {
    order: VecDeque<String>,
}

impl InsertionOrder {
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Push ==
    /// Records `key` as the newest insertion, dropping any earlier position.
    pub fn push(&mut self, key: &str) {
        self.remove(key);
        self.order.push_back(key.to_string());
    }

    // == Remove ==
    /// Removes a key from the tracker.
    pub fn remove(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
    }

    // == Oldest ==
    /// Returns the oldest surviving insertion without removing it.
    pub fn oldest(&self) -> Option<&String> {
        self.order.front()
    }

    /// Returns and removes the oldest insertion.
    pub fn pop_oldest(&mut self) -> Option<String> {
        self.order.pop_front()
    }

    /// Iterates keys from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn keys(order: &InsertionOrder) -> Vec<&str> {
        order.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_order_new() {
        let order = InsertionOrder::new();
        assert!(order.is_empty());
        assert_eq!(order.oldest(), None);
    }

    #[test]
    fn test_push_keeps_insertion_order() {
        let mut order = InsertionOrder::new();

        order.push("a");
        order.push("b");
        order.push("c");

        assert_eq!(order.len(), 3);
        assert_eq!(keys(&order), vec!["a", "b", "c"]);
        assert_eq!(order.oldest(), Some(&"a".to_string()));
    }

    #[test]
    fn test_push_existing_moves_to_newest() {
        let mut order = InsertionOrder::new();

        order.push("a");
        order.push("b");
        order.push("c");
        order.push("a");

        assert_eq!(order.len(), 3);
        assert_eq!(keys(&order), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_pop_oldest() {
        let mut order = InsertionOrder::new();

        order.push("a");
        order.push("b");

        assert_eq!(order.pop_oldest(), Some("a".to_string()));
        assert_eq!(order.pop_oldest(), Some("b".to_string()));
        assert_eq!(order.pop_oldest(), None);
    }

    #[test]
    fn test_remove() {
        let mut order = InsertionOrder::new();

        order.push("a");
        order.push("b");
        order.push("c");
        order.remove("b");
        order.remove("missing");

        assert_eq!(keys(&order), vec!["a", "c"]);
    }

    #[test]
    fn test_clear() {
        let mut order = InsertionOrder::new();
        order.push("a");
        order.clear();
        assert!(order.is_empty());
    }
}
