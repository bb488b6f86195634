//! Fixed-size pagination over the filtered, sorted snapshot.

use std::str::FromStr;

use serde::Serialize;

/// Page sizes a caller may select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    #[default]
    Ten,
    Twenty,
    Fifty,
    Hundred,
}

impl PageSize {
    pub fn as_usize(self) -> usize {
        match self {
            PageSize::Ten => 10,
            PageSize::Twenty => 20,
            PageSize::Fifty => 50,
            PageSize::Hundred => 100,
        }
    }
}

impl std::fmt::Display for PageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_usize())
    }
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "10" => Ok(PageSize::Ten),
            "20" => Ok(PageSize::Twenty),
            "50" => Ok(PageSize::Fifty),
            "100" => Ok(PageSize::Hundred),
            _ => Err(format!("Invalid page size: {} (allowed: 10, 20, 50, 100)", s)),
        }
    }
}

/// One rendered page plus the totals the navigation controls need.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub page_index: usize,
    pub total_pages: usize,
    pub total_count: usize,
}

impl<T> Page<T> {
    /// Whether a next page exists; used to disable forward navigation.
    pub fn has_next(&self) -> bool {
        self.page_index + 1 < self.total_pages
    }

    /// Whether a previous page exists.
    pub fn has_prev(&self) -> bool {
        self.page_index > 0 && self.total_pages > 0
    }
}

/// Slice one zero-indexed page out of the sequence.
///
/// An index at or past the last page yields an empty page, never an
/// error; navigation clamping is the caller's job.
pub fn paginate<T: Clone>(records: &[T], page_index: usize, page_size: PageSize) -> Page<T> {
    let size = page_size.as_usize();
    let total_count = records.len();
    let total_pages = total_count.div_ceil(size);

    let start = page_index.saturating_mul(size);
    let page = if start >= total_count {
        Vec::new()
    } else {
        let end = (start + size).min(total_count);
        records[start..end].to_vec()
    };

    Page {
        records: page,
        page_index,
        total_pages,
        total_count,
    }
}
