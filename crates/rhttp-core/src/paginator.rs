/// Scroll state for a fixed-height window into a list of lines.
///
/// `offset` stays within `0..=len.saturating_sub(page_size)` as long as
/// callers pass the current line count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    offset: usize,
    shift: usize,
    page_size: usize,
}

impl Paginator {
    pub fn new(shift: usize) -> Self {
        Self {
            offset: 0,
            shift: shift.max(1),
            page_size: 0,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Visible slice of `lines` for the current offset and page size.
    pub fn page<'a, T>(&self, lines: &'a [T]) -> &'a [T] {
        let start = self.offset.min(lines.len());
        let end = (start + self.page_size).min(lines.len());
        &lines[start..end]
    }

    /// Advance by the shift, snapping so the last page stays full height.
    pub fn page_down(&mut self, len: usize) {
        if self.offset + self.shift + self.page_size <= len {
            self.offset += self.shift;
        } else {
            self.offset = len.saturating_sub(self.page_size);
        }
    }

    pub fn page_up(&mut self) {
        self.offset = self.offset.saturating_sub(self.shift);
    }

    /// Update the page size (recomputed each render) and re-clamp.
    pub fn set_page_size(&mut self, page_size: usize, len: usize) {
        self.page_size = page_size;
        self.offset = self.offset.min(len.saturating_sub(page_size));
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_page_down_snaps_to_full_last_page() {
        let lines: Vec<usize> = (0..23).collect();
        let mut pager = Paginator::new(5);
        pager.set_page_size(10, lines.len());

        let mut offsets = Vec::new();
        for _ in 0..4 {
            pager.page_down(lines.len());
            offsets.push(pager.offset());
        }
        assert_eq!(offsets, vec![5, 10, 13, 13]);
        assert_eq!(pager.page(&lines).len(), 10);
        assert_eq!(pager.page(&lines)[9], 22);

        pager.page_up();
        assert_eq!(pager.offset(), 8);
    }

    #[test]
    fn test_short_content_never_scrolls() {
        let lines = ["a", "b", "c"];
        let mut pager = Paginator::new(5);
        pager.set_page_size(10, lines.len());
        pager.page_down(lines.len());
        assert_eq!(pager.offset(), 0);
        assert_eq!(pager.page(&lines), &lines[..]);
        pager.page_up();
        assert_eq!(pager.offset(), 0);
    }

    #[test]
    fn test_growing_page_size_clamps_offset() {
        let mut pager = Paginator::new(5);
        pager.set_page_size(10, 30);
        pager.page_down(30);
        pager.page_down(30);
        assert_eq!(pager.offset(), 10);
        pager.set_page_size(25, 30);
        assert_eq!(pager.offset(), 5);
    }

    #[test]
    fn test_page_handles_stale_offset() {
        let mut pager = Paginator::new(5);
        pager.set_page_size(4, 100);
        for _ in 0..10 {
            pager.page_down(100);
        }
        let short = [1, 2, 3];
        assert!(pager.page(&short).is_empty());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Down,
        Up,
        Resize(usize),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Down),
            Just(Op::Up),
            (0usize..40).prop_map(Op::Resize),
        ]
    }

    proptest! {
        #[test]
        fn test_offset_stays_in_bounds(
            len in 0usize..200,
            shift in 1usize..12,
            page in 0usize..40,
            ops in prop::collection::vec(op_strategy(), 0..64),
        ) {
            let mut pager = Paginator::new(shift);
            pager.set_page_size(page, len);
            for op in ops {
                match op {
                    Op::Down => pager.page_down(len),
                    Op::Up => pager.page_up(),
                    Op::Resize(size) => pager.set_page_size(size, len),
                }
                prop_assert!(pager.offset() <= len.saturating_sub(pager.page_size()));
            }
        }
    }
}
