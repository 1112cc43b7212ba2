/// Fixed-capacity ring buffer of recent samples, oldest dropped first.
#[derive(Clone, Debug)]
pub struct HistoryRing {
    data: Vec<f32>,
    head: usize,
    len: usize,
}

impl HistoryRing {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "history ring needs a non-zero capacity");
        Self {
            data: vec![0.0; capacity],
            head: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn push(&mut self, value: f32) {
        let capacity = self.capacity();
        self.data[self.head] = value;
        self.head = (self.head + 1) % capacity;
        if self.len < capacity {
            self.len += 1;
        }
    }

    /// Samples in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        let capacity = self.capacity();
        let start = if self.len < capacity { 0 } else { self.head };
        (0..self.len).map(move |i| self.data[(start + i) % capacity])
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn last(&self) -> Option<f32> {
        if self.len == 0 {
            return None;
        }
        let capacity = self.capacity();
        Some(self.data[(self.head + capacity - 1) % capacity])
    }

    /// Drop every sample and zero the backing storage.
    pub fn clear(&mut self) {
        self.data.iter_mut().for_each(|v| *v = 0.0);
        self.head = 0;
        self.len = 0;
    }

    /// Full-width copy for plotting: missing leading samples read as zero.
    pub fn padded(&self) -> Vec<f32> {
        let mut out = vec![0.0; self.capacity() - self.len];
        out.extend(self.iter());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iterates_in_insertion_order_after_wrap() {
        let mut ring = HistoryRing::new(3);
        for v in [1.0, 2.0, 3.0, 4.0] {
            ring.push(v);
        }
        assert_eq!(ring.iter().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);
        assert_eq!(ring.last(), Some(4.0));
        assert_eq!(ring.len(), 3);
    }

    #[test]
    fn clear_empties_and_zeroes() {
        let mut ring = HistoryRing::new(4);
        ring.push(7.0);
        ring.push(8.0);
        ring.clear();
        assert!(ring.is_empty());
        assert_eq!(ring.last(), None);
        assert_eq!(ring.padded(), vec![0.0; 4]);
    }

    #[test]
    fn padded_puts_zeros_before_partial_history() {
        let mut ring = HistoryRing::new(4);
        ring.push(5.0);
        ring.push(6.0);
        assert_eq!(ring.padded(), vec![0.0, 0.0, 5.0, 6.0]);
    }
}
