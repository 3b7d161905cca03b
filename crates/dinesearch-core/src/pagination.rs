//! Page number / page size arithmetic.
//!
//! Pages are 1-based. A result set with zero matches has zero pages.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A zero-based window into the ranked result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    pub offset: usize,
    pub limit: usize,
}

impl Paging {
    /// Window used when a query never asked for a page.
    pub const DEFAULT_LIMIT: usize = 10;

    pub fn for_page(page_number: usize, page_size: usize) -> Result<Self> {
        if page_number < 1 {
            return Err(Error::invalid(format!("page number must be at least 1, got {}", page_number)));
        }
        if page_size == 0 {
            return Err(Error::invalid("page size must be positive"));
        }
        let offset = (page_number - 1)
            .checked_mul(page_size)
            .filter(|offset| offset.checked_add(page_size).is_some())
            .ok_or_else(|| Error::invalid(format!("page {} of size {} is out of range", page_number, page_size)))?;
        Ok(Self { offset, limit: page_size })
    }
}

impl Default for Paging {
    fn default() -> Self {
        Self { offset: 0, limit: Self::DEFAULT_LIMIT }
    }
}

/// Smallest `n` with `n * page_size >= total_matching`.
pub fn compute_total_pages(total_matching: u64, page_size: usize) -> Result<u64> {
    if page_size == 0 {
        return Err(Error::invalid("page size must be positive"));
    }
    let page_size = page_size as u64;
    let mut pages = total_matching / page_size;
    if total_matching % page_size > 0 {
        pages += 1;
    }
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_of_italian() {
        let paging = Paging::for_page(1, 10).expect("paging");
        assert_eq!(paging, Paging { offset: 0, limit: 10 });
        assert_eq!(compute_total_pages(23, 10).expect("pages"), 3);
    }

    #[test]
    fn offset_is_zero_based() {
        assert_eq!(Paging::for_page(3, 10).expect("paging").offset, 20);
        assert_eq!(Paging::for_page(2, 7).expect("paging").offset, 7);
    }

    #[test]
    fn invalid_paging_is_rejected() {
        assert!(matches!(Paging::for_page(0, 10), Err(Error::InvalidArgument(_))));
        assert!(matches!(Paging::for_page(1, 0), Err(Error::InvalidArgument(_))));
        assert!(matches!(Paging::for_page(usize::MAX, 2), Err(Error::InvalidArgument(_))));
        assert!(matches!(compute_total_pages(5, 0), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn window_end_must_fit() {
        assert!(matches!(Paging::for_page(usize::MAX / 10 + 1, 10), Err(Error::InvalidArgument(_))));
        let last = Paging::for_page(usize::MAX / 10, 10).expect("paging");
        assert!(last.offset.checked_add(last.limit).is_some());
    }

    #[test]
    fn zero_matches_means_zero_pages() {
        assert_eq!(compute_total_pages(0, 10).expect("pages"), 0);
        assert_eq!(compute_total_pages(0, 1).expect("pages"), 0);
    }

    #[test]
    fn total_pages_is_tight_upper_bound() {
        for size in 1..=25usize {
            for matches in 0..=200u64 {
                let pages = compute_total_pages(matches, size).expect("pages");
                let size = size as u64;
                assert!(pages * size >= matches, "m={} s={} n={}", matches, size, pages);
                if pages > 0 {
                    assert!((pages - 1) * size < matches, "m={} s={} n={}", matches, size, pages);
                }
            }
        }
    }

    #[test]
    fn exact_multiples() {
        assert_eq!(compute_total_pages(20, 10).expect("pages"), 2);
        assert_eq!(compute_total_pages(21, 10).expect("pages"), 3);
        assert_eq!(compute_total_pages(u64::MAX, 1).expect("pages"), u64::MAX);
    }
}
