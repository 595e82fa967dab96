//! Offset pagination over `$top` / `$skip`

/// Largest page the governance API serves
pub const MAX_PAGE_SIZE: usize = 1000;

/// Default number of records requested per page
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Position in a paged collection
///
/// A page shorter than `page_size` is the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    skip: usize,
    page_size: usize,
    pages: usize,
}

impl PageCursor {
    /// Start at the first record
    ///
    /// A zero page size is treated as one.
    pub fn new(page_size: usize) -> Self {
        Self {
            skip: 0,
            page_size: page_size.max(1),
            pages: 0,
        }
    }

    /// Value for `$top`
    pub fn top(&self) -> usize {
        self.page_size
    }

    /// Value for `$skip`
    pub fn skip(&self) -> usize {
        self.skip
    }

    /// Pages consumed so far
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Consume a page of `received` records
    ///
    /// `skip` always moves by `page_size`, even if the server returned more
    /// than `$top` records. Returns `true` if another page should be requested.
    ///
    /// ```
    /// use arx::core::export::PageCursor;
    ///
    /// let mut cursor = PageCursor::new(100);
    /// assert!(cursor.advance(100));
    /// assert_eq!(cursor.skip(), 100);
    /// assert!(!cursor.advance(43));
    /// ```
    pub fn advance(&mut self, received: usize) -> bool {
        self.pages += 1;
        self.skip += self.page_size;
        received >= self.page_size
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_pages_terminate() {
        let mut cursor = PageCursor::new(100);
        let mut requests = Vec::new();

        for received in [100, 100, 43] {
            requests.push((cursor.skip(), cursor.top()));
            if !cursor.advance(received) {
                break;
            }
        }

        assert_eq!(requests, vec![(0, 100), (100, 100), (200, 100)]);
        assert_eq!(cursor.pages(), 3);
    }

    #[test]
    fn test_oversized_page_moves_by_page_size() {
        let mut cursor = PageCursor::new(100);
        assert!(cursor.advance(150));
        assert_eq!(cursor.skip(), 100);
        assert!(!cursor.advance(20));
        assert_eq!(cursor.skip(), 200);
    }

    #[test]
    fn test_empty_first_page_terminates() {
        let mut cursor = PageCursor::new(50);
        assert!(!cursor.advance(0));
        assert_eq!(cursor.pages(), 1);
    }

    #[test]
    fn test_exact_multiple_needs_one_empty_page() {
        let mut cursor = PageCursor::new(10);
        assert!(cursor.advance(10));
        assert!(!cursor.advance(0));
        assert_eq!(cursor.pages(), 2);
    }

    #[test]
    fn test_zero_page_size_clamped() {
        assert_eq!(PageCursor::new(0).top(), 1);
        assert_eq!(PageCursor::default().top(), DEFAULT_PAGE_SIZE);
    }
}
