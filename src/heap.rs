//! Array-backed binary min-heap, used as the free-slot priority queue.
//!
//! The tree structure is implicit in the backing Vec: children of index `i`
//! live at `2i + 1` and `2i + 2`. No pointer-based nodes, no cycles.

#[derive(Debug, Clone)]
pub struct MinHeap<T: Ord> {
    items: Vec<T>,
}

impl<T: Ord> MinHeap<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a heap from an arbitrary sequence in linear time.
    ///
    /// Sinks from the last parent down to the root (standard heap
    /// construction), rather than pushing n times.
    pub fn from_values(values: Vec<T>) -> Self {
        let mut heap = Self { items: values };
        if heap.items.len() > 1 {
            for i in (0..heap.items.len() / 2).rev() {
                heap.sink(i);
            }
        }
        heap
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Non-destructive look at the smallest element.
    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    /// Add an element; O(log n).
    pub fn push(&mut self, value: T) {
        self.items.push(value);
        self.swim(self.items.len() - 1);
    }

    /// Remove and return the smallest element; `None` when empty. O(log n).
    pub fn pop(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let last = self.items.len() - 1;
        self.items.swap(0, last);
        let top = self.items.pop();
        if !self.items.is_empty() {
            self.sink(0);
        }
        top
    }

    fn swim(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.items[parent] <= self.items[i] {
                break;
            }
            self.items.swap(parent, i);
            i = parent;
        }
    }

    fn sink(&mut self, mut i: usize) {
        let n = self.items.len();
        loop {
            let mut smallest = i;
            let left = 2 * i + 1;
            let right = 2 * i + 2;
            if left < n && self.items[left] < self.items[smallest] {
                smallest = left;
            }
            if right < n && self.items[right] < self.items[smallest] {
                smallest = right;
            }
            if smallest == i {
                break;
            }
            self.items.swap(i, smallest);
            i = smallest;
        }
    }
}

impl<T: Ord> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(mut heap: MinHeap<u32>) -> Vec<u32> {
        let mut out = Vec::with_capacity(heap.len());
        while let Some(v) = heap.pop() {
            out.push(v);
        }
        out
    }

    #[test]
    fn pop_on_empty_returns_none() {
        let mut heap: MinHeap<u32> = MinHeap::new();
        assert!(heap.is_empty());
        assert_eq!(heap.pop(), None);
        assert_eq!(heap.peek(), None);
    }

    #[test]
    fn push_then_pop_yields_ascending_order() {
        let mut heap = MinHeap::new();
        for v in [7u32, 3, 9, 1, 5, 8, 2, 6, 4] {
            heap.push(v);
        }
        assert_eq!(heap.len(), 9);
        assert_eq!(drain(heap), vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn from_values_heapifies_arbitrary_input() {
        let heap = MinHeap::from_values(vec![10u32, 4, 8, 1, 7, 2]);
        assert_eq!(heap.peek(), Some(&1));
        assert_eq!(drain(heap), vec![1, 2, 4, 7, 8, 10]);
    }

    #[test]
    fn from_values_handles_trivial_sizes() {
        assert_eq!(drain(MinHeap::from_values(Vec::new())), Vec::<u32>::new());
        assert_eq!(drain(MinHeap::from_values(vec![42u32])), vec![42]);
    }

    #[test]
    fn peek_does_not_remove() {
        let mut heap = MinHeap::from_values(vec![3u32, 1, 2]);
        assert_eq!(heap.peek(), Some(&1));
        assert_eq!(heap.len(), 3);
        assert_eq!(heap.pop(), Some(1));
        assert_eq!(heap.len(), 2);
    }

    #[test]
    fn interleaved_push_pop_keeps_min_first() {
        let mut heap = MinHeap::from_values(vec![2u32, 5, 9]);
        assert_eq!(heap.pop(), Some(2));
        heap.push(1);
        heap.push(7);
        assert_eq!(heap.pop(), Some(1));
        assert_eq!(heap.pop(), Some(5));
        heap.push(3);
        assert_eq!(drain(heap), vec![3, 7, 9]);
    }

    #[test]
    fn readmitted_values_sort_back_in() {
        // Free slots come back in arbitrary order; lowest must stay first.
        let mut heap = MinHeap::from_values((1u32..=5).collect());
        let a = heap.pop().unwrap();
        let b = heap.pop().unwrap();
        assert_eq!((a, b), (1, 2));
        heap.push(b);
        heap.push(a);
        assert_eq!(drain(heap), vec![1, 2, 3, 4, 5]);
    }
}
