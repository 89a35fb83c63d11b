use std::collections::VecDeque;

/// Fixed-capacity FIFO of records, oldest first.
///
/// Once `capacity` is reached every push evicts exactly one record from
/// the front, so `len() <= capacity()` holds after every operation.
#[derive(Debug, Clone)]
pub struct History<T> {
    records: VecDeque<T>,
    capacity: usize,
}

impl<T> History<T> {
    /// Panics on a zero capacity; validated configs never produce one.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be positive");
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, record: T) {
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates oldest → newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.records.iter()
    }

    /// Record `back` positions before the newest one (`0` = newest).
    pub fn nth_from_back(&self, back: usize) -> Option<&T> {
        let len = self.records.len();
        if back >= len {
            return None;
        }
        self.records.get(len - 1 - back)
    }

    pub fn oldest(&self) -> Option<&T> {
        self.records.front()
    }
}

impl<T: Clone> History<T> {
    /// Copy of the current contents, oldest first.
    pub fn snapshot(&self) -> Vec<T> {
        self.records.iter().cloned().collect()
    }

    /// Up to `n` most recent records in push order (most recent last).
    pub fn last_n(&self, n: usize) -> Vec<T> {
        let skip = self.records.len().saturating_sub(n);
        self.records.iter().skip(skip).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_last_k_in_push_order() {
        let mut history = History::with_capacity(5);
        for i in 0..12 {
            history.push(i);
            assert!(history.len() <= 5);
        }
        assert_eq!(history.snapshot(), vec![7, 8, 9, 10, 11]);
        assert_eq!(history.oldest(), Some(&7));
    }

    #[test]
    fn capacity_of_one_holds_only_the_newest() {
        let mut history = History::with_capacity(1);
        history.push("a");
        history.push("b");
        assert_eq!(history.snapshot(), vec!["b"]);
    }

    #[test]
    fn last_n_truncates_to_what_is_available() {
        let mut history = History::with_capacity(100);
        for i in 0..4 {
            history.push(i);
        }
        assert_eq!(history.last_n(10), vec![0, 1, 2, 3]);
        assert_eq!(history.last_n(2), vec![2, 3]);

        let empty: History<u32> = History::with_capacity(3);
        assert!(empty.last_n(10).is_empty());
    }

    #[test]
    fn nth_from_back_indexes_from_newest() {
        let mut history = History::with_capacity(3);
        for i in 0..5 {
            history.push(i);
        }
        assert_eq!(history.nth_from_back(0), Some(&4));
        assert_eq!(history.nth_from_back(2), Some(&2));
        assert_eq!(history.nth_from_back(3), None);
    }

    #[test]
    #[should_panic(expected = "history capacity must be positive")]
    fn zero_capacity_is_rejected() {
        let _ = History::<u8>::with_capacity(0);
    }
}
