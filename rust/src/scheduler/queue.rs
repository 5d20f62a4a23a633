//! Work queue supporting the scheduler's reordering heuristics.

use std::collections::VecDeque;

use crate::models::Unit;

/// Double-ended backlog queue with batched removal and prepend.
#[derive(Debug, Clone, Default)]
pub struct WorkQueue {
    items: VecDeque<Unit>,
}

impl WorkQueue {
    pub fn new(backlog: Vec<Unit>) -> Self {
        Self {
            items: backlog.into(),
        }
    }

    #[inline]
    pub fn pop_front(&mut self) -> Option<Unit> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Remove every unit matching `pred`, returned in queue order.
    pub fn extract_where<F>(&mut self, mut pred: F) -> Vec<Unit>
    where
        F: FnMut(&Unit) -> bool,
    {
        let mut extracted = Vec::new();
        let mut kept = VecDeque::with_capacity(self.items.len());
        for unit in self.items.drain(..) {
            if pred(&unit) {
                extracted.push(unit);
            } else {
                kept.push_back(unit);
            }
        }
        self.items = kept;
        extracted
    }

    /// Remove the first unit matching `pred`.
    pub fn take_first<F>(&mut self, pred: F) -> Option<Unit>
    where
        F: FnMut(&Unit) -> bool,
    {
        let index = self.items.iter().position(pred)?;
        self.items.remove(index)
    }

    /// Insert `units` ahead of everything else, preserving their order.
    pub fn prepend(&mut self, units: Vec<Unit>) {
        for unit in units.into_iter().rev() {
            self.items.push_front(unit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forms(queue: &WorkQueue) -> Vec<String> {
        queue.items.iter().map(|u| u.normalized_form.clone()).collect()
    }

    #[test]
    fn test_extract_and_prepend_preserve_order() {
        let mut queue = WorkQueue::new(vec![
            Unit::new("a", 1),
            Unit::new("b", 2),
            Unit::new("c", 1),
            Unit::new("d", 2),
        ]);

        let pulled = queue.extract_where(|u| u.bucket == 2);
        assert_eq!(forms(&queue), vec!["a", "c"]);

        queue.prepend(pulled);
        assert_eq!(forms(&queue), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_take_first_removes_one() {
        let mut queue = WorkQueue::new(vec![
            Unit::new("x", 1),
            Unit::new("y", 1),
            Unit::new("y", 2),
        ]);

        let taken = queue.take_first(|u| u.normalized_form == "y").unwrap();
        assert_eq!(taken.bucket, 1);
        assert_eq!(queue.len(), 2);
        assert!(queue.take_first(|u| u.normalized_form == "z").is_none());
    }

    #[test]
    fn test_pop_front_drains() {
        let mut queue = WorkQueue::new(vec![Unit::new("a", 1)]);
        assert_eq!(queue.pop_front().map(|u| u.normalized_form), Some("a".to_string()));
        assert!(queue.pop_front().is_none());
        assert_eq!(queue.len(), 0);
    }
}
