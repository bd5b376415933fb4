//! `MinScored<K, T>` pairs a score with a value for use in a `BinaryHeap`,
//! comparing in reverse so the heap behaves as a min-heap. Grounded on
//! `petgraph::scored::MinScored`, used here by the dual-routing Dijkstra
//! ([`crate::algo::dual`]) and the min-cost-flow potential search
//! ([`crate::algo::flow`]).

use core::cmp::Ordering;

#[derive(Copy, Clone, Debug)]
pub(crate) struct MinScored<K, T>(pub K, pub T);

impl<K: PartialEq, T> PartialEq for MinScored<K, T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<K: PartialEq, T> Eq for MinScored<K, T> {}

impl<K: PartialOrd, T> PartialOrd for MinScored<K, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: PartialOrd, T> Ord for MinScored<K, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so `BinaryHeap` pops the smallest score first.
        other.0.partial_cmp(&self.0).unwrap_or(Ordering::Equal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::collections::BinaryHeap;

    #[test]
    fn heap_pops_smallest_first() {
        let mut heap = BinaryHeap::new();
        heap.push(MinScored(3, "c"));
        heap.push(MinScored(1, "a"));
        heap.push(MinScored(2, "b"));
        assert_eq!(heap.pop().unwrap().1, "a");
        assert_eq!(heap.pop().unwrap().1, "b");
        assert_eq!(heap.pop().unwrap().1, "c");
    }
}
