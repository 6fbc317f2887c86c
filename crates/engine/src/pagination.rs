//! Client-side pagination of cached lists.

/// Rows revealed per "load more" step.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Returns the items of a single 1-based page: `[(page-1)*size, page*size)`.
///
/// Out-of-range pages yield an empty slice. A page of 0 is read as 1.
pub fn page_window<T>(items: &[T], page: usize, size: usize) -> &[T] {
    let size = size.max(1);
    let start = (page.max(1) - 1).saturating_mul(size).min(items.len());
    let end = start.saturating_add(size).min(items.len());
    &items[start..end]
}

/// Returns the visible prefix after `page` "load more" steps:
/// `[0, page*size)`, clipped to the list.
pub fn cumulative<T>(items: &[T], page: usize, size: usize) -> &[T] {
    let end = page.max(1).saturating_mul(size.max(1)).min(items.len());
    &items[..end]
}

/// Cumulative-reveal cursor. The page only ever grows, until [`reset`].
///
/// [`reset`]: LoadMore::reset
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadMore {
    page: usize,
    size: usize,
}

impl Default for LoadMore {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl LoadMore {
    pub fn new(size: usize) -> Self {
        Self {
            page: 1,
            size: size.max(1),
        }
    }

    /// Starts at `page` (values below 1 are read as 1).
    pub fn at(size: usize, page: usize) -> Self {
        Self {
            page: page.max(1),
            size: size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn visible<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        cumulative(items, self.page, self.size)
    }

    /// `true` while some items of a list of `len` are still hidden.
    pub fn has_more(&self, len: usize) -> bool {
        self.page.saturating_mul(self.size) < len
    }

    pub fn advance(&mut self) {
        self.page = self.page.saturating_add(1);
    }

    /// Back to the first page; only done on a full reload.
    pub fn reset(&mut self) {
        self.page = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_slices_one_page() {
        let items: Vec<u32> = (0..25).collect();
        assert_eq!(page_window(&items, 1, 10), &items[0..10]);
        assert_eq!(page_window(&items, 3, 10), &items[20..25]);
        assert!(page_window(&items, 4, 10).is_empty());
        assert!(page_window(&items, usize::MAX, 10).is_empty());
        assert_eq!(page_window(&items, 0, 10), &items[0..10]);
    }

    #[test]
    fn cumulative_len_is_min_of_len_and_page_times_size() {
        let items: Vec<u32> = (0..25).collect();
        for page in 1..6 {
            let visible = cumulative(&items, page, 10);
            assert_eq!(visible.len(), items.len().min(page * 10));
        }
        let empty: Vec<u32> = Vec::new();
        assert!(cumulative(&empty, 3, 10).is_empty());
    }

    #[test]
    fn load_more_only_grows_the_visible_prefix() {
        let items: Vec<u32> = (0..23).collect();
        let mut cursor = LoadMore::new(10);
        let mut previous: Vec<u32> = cursor.visible(&items).to_vec();
        assert!(cursor.has_more(items.len()));

        while cursor.has_more(items.len()) {
            cursor.advance();
            let now = cursor.visible(&items);
            assert!(now.len() > previous.len());
            assert_eq!(&now[..previous.len()], previous.as_slice());
            previous = now.to_vec();
        }
        assert_eq!(previous.len(), 23);
        assert_eq!(cursor.page(), 3);

        cursor.reset();
        assert_eq!(cursor.visible(&items).len(), 10);
    }
}
