//! Top-K tracking for scored corpus entries.

use std::cmp::Ordering;

/// Scored corpus entry, identified by its insertion index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scored {
    /// Position of the entry in the corpus.
    pub index: usize,
    /// Mismatch ratio against the query.
    pub mismatch: f64,
}

fn scored_cmp_asc(a: &Scored, b: &Scored) -> Ordering {
    a.mismatch
        .total_cmp(&b.mismatch)
        .then_with(|| a.index.cmp(&b.index))
}

/// Sorts by ascending mismatch with insertion order breaking ties.
pub(crate) fn sort_scored_asc(items: &mut [Scored]) {
    items.sort_by(scored_cmp_asc);
}

/// Top-K container with O(k) insertion cost.
pub struct TopK<T> {
    k: usize,
    items: Vec<T>,
}

impl TopK<Scored> {
    /// Creates a new Top-K collector.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            items: Vec::with_capacity(k),
        }
    }

    /// Pushes a score, evicting the current worst if at capacity.
    pub fn push(&mut self, item: Scored) {
        if self.k == 0 {
            return;
        }
        if self.items.len() < self.k {
            self.items.push(item);
            return;
        }

        let mut worst_idx = 0usize;
        for (idx, cur) in self.items.iter().enumerate().skip(1) {
            if scored_cmp_asc(cur, &self.items[worst_idx]) == Ordering::Greater {
                worst_idx = idx;
            }
        }

        if scored_cmp_asc(&item, &self.items[worst_idx]) == Ordering::Less {
            self.items[worst_idx] = item;
        }
    }

    /// Returns the kept scores, best first.
    pub fn into_sorted_asc(mut self) -> Vec<Scored> {
        sort_scored_asc(&mut self.items);
        self.items
    }
}
