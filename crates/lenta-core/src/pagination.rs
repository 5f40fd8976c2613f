//! Feed pagination - a pure function over an ordered post collection.
//!
//! The page number arrives as an untrusted query parameter. Anything that is
//! not a positive integer falls back to the first page; a number past the end
//! clamps to the last page. Out-of-range requests never error.

/// Fixed number of posts per page.
pub const PAGE_SIZE: usize = 10;

/// One page of an ordered collection plus the metadata the UI needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-indexed page number after clamping.
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }
}

/// Parse the raw `?page=` value. `None` means "not a usable page number".
pub fn parse_page_param(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|&n| n >= 1)
}

/// Slice an ordered collection into the requested page.
pub fn paginate<T>(items: Vec<T>, requested: Option<&str>) -> Page<T> {
    let total_items = items.len();
    let total_pages = total_items.div_ceil(PAGE_SIZE).max(1);
    let number = parse_page_param(requested).unwrap_or(1).min(total_pages);

    let start = (number - 1) * PAGE_SIZE;
    let page_items: Vec<T> = items
        .into_iter()
        .skip(start)
        .take(PAGE_SIZE)
        .collect();

    Page {
        items: page_items,
        number,
        total_pages,
        total_items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posts(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn thirteen_items_split_ten_and_three() {
        let first = paginate(posts(13), None);
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.number, 1);
        assert_eq!(first.total_pages, 2);
        assert!(first.has_next());
        assert!(!first.has_previous());

        let second = paginate(posts(13), Some("2"));
        assert_eq!(second.items.len(), 3);
        assert_eq!(second.number, 2);
        assert!(!second.has_next());
        assert!(second.has_previous());
    }

    #[test]
    fn every_page_holds_at_most_ten() {
        for page in 1..=4 {
            let p = paginate(posts(37), Some(&page.to_string()));
            assert!(p.items.len() <= PAGE_SIZE);
            if page < 4 {
                assert_eq!(p.items.len(), PAGE_SIZE);
            }
        }
    }

    #[test]
    fn evenly_divisible_last_page_is_full() {
        let last = paginate(posts(20), Some("2"));
        assert_eq!(last.items.len(), 10);
        assert_eq!(last.total_pages, 2);
    }

    #[test]
    fn junk_param_falls_back_to_first_page() {
        for raw in ["abc", "", "-3", "0", "1.5"] {
            let p = paginate(posts(13), Some(raw));
            assert_eq!(p.number, 1);
            assert_eq!(p.items.len(), 10);
        }
    }

    #[test]
    fn overflow_param_clamps_to_last_page() {
        let p = paginate(posts(13), Some("999"));
        assert_eq!(p.number, 2);
        assert_eq!(p.items.len(), 3);
    }

    #[test]
    fn empty_collection_yields_one_empty_page() {
        let p = paginate(Vec::<usize>::new(), Some("5"));
        assert_eq!(p.number, 1);
        assert_eq!(p.total_pages, 1);
        assert!(p.items.is_empty());
    }

    #[test]
    fn pages_preserve_input_order() {
        let p = paginate(posts(13), Some("2"));
        assert_eq!(p.items, vec![10, 11, 12]);
    }
}
