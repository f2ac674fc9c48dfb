//! Client-side pagination over the record store.
//!
//! Pages are 1-based. The pager keeps no copy of the records; the visible
//! window is recomputed from the store on every read.

use std::ops::Range;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Number of pages needed for `len` records; an empty list still has page 1.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// Index range of `page` within a list of `len` records, clamped to `len`.
/// Pages past the data yield an empty range.
pub fn visible_range(len: usize, page: usize, page_size: usize) -> Range<usize> {
    let page_size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(page_size).min(len);
    let end = start.saturating_add(page_size).min(len);
    start..end
}

pub fn visible_slice<T>(records: &[T], page: usize, page_size: usize) -> &[T] {
    &records[visible_range(records.len(), page, page_size)]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    page_size: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self { page: 1, page_size: page_size.max(1) }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Jump to `page` without clamping to the data; only page 0 is lifted to 1.
    pub fn go_to(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn next_page(&mut self, len: usize) {
        let last = total_pages(len, self.page_size);
        self.page = (self.page + 1).min(last).max(1);
    }

    pub fn prev_page(&mut self, len: usize) {
        let last = total_pages(len, self.page_size);
        self.page = self.page.saturating_sub(1).clamp(1, last);
    }

    pub fn total_pages(&self, len: usize) -> usize {
        total_pages(len, self.page_size)
    }

    pub fn range(&self, len: usize) -> Range<usize> {
        visible_range(len, self.page, self.page_size)
    }

    pub fn slice<'a, T>(&self, records: &'a [T]) -> &'a [T] {
        visible_slice(records, self.page, self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_matches_ceiling_division() {
        for p in 1..=7usize {
            for n in 0..=40usize {
                let expected = if n == 0 { 1 } else { n.div_ceil(p) };
                assert_eq!(total_pages(n, p), expected, "n={n} p={p}");
            }
        }
    }

    #[test]
    fn pages_concatenate_back_to_the_whole_list() {
        for p in 1..=6usize {
            for n in 0..=30usize {
                let items: Vec<usize> = (0..n).collect();
                let rebuilt: Vec<usize> = (1..=total_pages(n, p))
                    .flat_map(|page| visible_slice(&items, page, p).iter().copied())
                    .collect();
                assert_eq!(rebuilt, items, "n={n} p={p}");
            }
        }
    }

    #[test]
    fn twenty_five_records_in_pages_of_ten() {
        let ids: Vec<u64> = (1..=25).collect();
        assert_eq!(visible_slice(&ids, 1, 10), &(1..=10).collect::<Vec<_>>()[..]);
        assert_eq!(visible_slice(&ids, 3, 10), &[21, 22, 23, 24, 25]);
        assert!(visible_slice(&ids, 4, 10).is_empty());
        assert!(visible_slice(&ids, usize::MAX, 10).is_empty());
    }

    #[test]
    fn go_to_does_not_clamp_but_stepping_does() {
        let mut pager = Pager::new(10);
        pager.go_to(7);
        assert_eq!(pager.page(), 7);
        assert_eq!(pager.range(25), 25..25);

        pager.prev_page(25);
        assert_eq!(pager.page(), 3);
        pager.next_page(25);
        assert_eq!(pager.page(), 3);

        pager.go_to(0);
        assert_eq!(pager.page(), 1);
        pager.prev_page(25);
        assert_eq!(pager.page(), 1);
    }

    #[test]
    fn zero_page_size_is_lifted_to_one() {
        let pager = Pager::new(0);
        assert_eq!(pager.page_size(), 1);
        assert_eq!(total_pages(3, 0), 3);
    }
}
