//! Page cursors shared by the popular-rates panel and the history panel.

/// Number of entries shown on one page of either panel.
pub const PAGE_SIZE: usize = 5;

/// A 1-based page position over a collection whose length may change
/// between renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    current_page: usize,
    page_size: usize,
}

/// One rendered page of a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub number: usize,
    pub total_pages: usize,
}

impl<T> Page<'_, T> {
    pub fn has_prev(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }
}

impl PageCursor {
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages needed for `len` items, never less than one.
    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size).max(1)
    }

    /// Pulls the cursor back into `[1, total_pages]`.
    pub fn clamp(&mut self, len: usize) {
        self.current_page = self.current_page.clamp(1, self.total_pages(len));
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Moves forward one page. Returns false when already on the last page.
    pub fn next(&mut self, len: usize) -> bool {
        self.clamp(len);
        if self.current_page < self.total_pages(len) {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Moves back one page. Returns false when already on the first page.
    pub fn prev(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    pub fn go_to(&mut self, page: usize, len: usize) {
        self.current_page = page;
        self.clamp(len);
    }

    /// Clamps against `items` and returns the current page of it.
    pub fn slice<'a, T>(&mut self, items: &'a [T]) -> Page<'a, T> {
        self.clamp(items.len());
        let start = ((self.current_page - 1) * self.page_size).min(items.len());
        let end = (start + self.page_size).min(items.len());
        Page {
            items: &items[start..end],
            number: self.current_page,
            total_pages: self.total_pages(items.len()),
        }
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        let cursor = PageCursor::default();
        assert_eq!(cursor.page_size(), PAGE_SIZE);
        assert_eq!(PageCursor::new(0).page_size(), 1);
        assert_eq!(cursor.total_pages(0), 1);
        assert_eq!(cursor.total_pages(5), 1);
        assert_eq!(cursor.total_pages(6), 2);
        assert_eq!(cursor.total_pages(10), 2);
        assert_eq!(cursor.total_pages(31), 7);
    }

    #[test]
    fn test_slice_pages() {
        let items: Vec<u32> = (1..=12).collect();
        let mut cursor = PageCursor::default();

        let page = cursor.slice(&items);
        assert_eq!(page.items, &[1, 2, 3, 4, 5]);
        assert_eq!(page.total_pages, 3);
        assert!(!page.has_prev());
        assert!(page.has_next());

        assert!(cursor.next(items.len()));
        assert!(cursor.next(items.len()));
        assert!(!cursor.next(items.len()));

        let page = cursor.slice(&items);
        assert_eq!(page.number, 3);
        assert_eq!(page.items, &[11, 12]);
        assert!(page.has_prev());
        assert!(!page.has_next());
    }

    #[test]
    fn test_prev_stops_at_first_page() {
        let mut cursor = PageCursor::default();
        assert!(!cursor.prev());
        assert_eq!(cursor.current_page(), 1);
    }

    #[test]
    fn test_clamps_when_collection_shrinks() {
        let items: Vec<u32> = (1..=10).collect();
        let mut cursor = PageCursor::default();
        cursor.go_to(2, items.len());
        assert_eq!(cursor.current_page(), 2);

        let page = cursor.slice(&items[..3]);
        assert_eq!(page.number, 1);
        assert_eq!(page.items, &[1, 2, 3]);

        cursor.go_to(4, 0);
        let empty: [u32; 0] = [];
        let page = cursor.slice(&empty);
        assert_eq!(page.number, 1);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_go_to_clamps_out_of_range() {
        let mut cursor = PageCursor::default();
        cursor.go_to(0, 12);
        assert_eq!(cursor.current_page(), 1);
        cursor.go_to(99, 12);
        assert_eq!(cursor.current_page(), 3);
    }
}
