//! Page/per-page windowing for list results.
//!
//! # Invariants
//! - Pages are 1-indexed; defaults are page 1 and [`QUESTIONS_PER_PAGE`].
//! - A page before the first or past the last yields an empty window with
//!   the true total. It is never an error; callers decide whether that is a
//!   "not found".
//! - The total is recomputed on every call.

/// Default window size for question lists.
pub const QUESTIONS_PER_PAGE: u32 = 10;
/// Upper bound applied to caller-provided window sizes.
pub const MAX_PER_PAGE: u32 = 100;

/// Requested window, normalized on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: QUESTIONS_PER_PAGE,
        }
    }
}

impl PageRequest {
    /// Builds a request from optional caller input.
    ///
    /// A missing or zero `per_page` uses the default; larger values are
    /// clamped to [`MAX_PER_PAGE`]. `page` is kept as given so an invalid
    /// page still produces an empty window instead of silently becoming 1.
    pub fn new(page: Option<i64>, per_page: Option<u32>) -> Self {
        let per_page = match per_page {
            None | Some(0) => QUESTIONS_PER_PAGE,
            Some(value) => value.min(MAX_PER_PAGE),
        };
        Self {
            page: page.unwrap_or(1),
            per_page,
        }
    }

    /// Zero-based row offset, or `None` for pages before the first.
    pub fn offset(&self) -> Option<u64> {
        if self.page < 1 {
            return None;
        }
        let skipped_pages = u64::try_from(self.page - 1).ok()?;
        skipped_pages.checked_mul(u64::from(self.per_page))
    }
}

/// One window of results plus the unwindowed total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page: i64,
    pub per_page: u32,
}

impl<T> Page<T> {
    fn empty(request: PageRequest, total_count: u64) -> Self {
        Self {
            items: Vec::new(),
            total_count,
            page: request.page,
            per_page: request.per_page,
        }
    }

    /// True when rows exist but this page does not reach any of them.
    pub fn is_out_of_range(&self) -> bool {
        self.items.is_empty() && self.total_count > 0
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// Windows an in-memory slice.
pub fn paginate<T: Clone>(items: &[T], request: PageRequest) -> Page<T> {
    let total_count = items.len() as u64;
    let Some(start) = window_start(request, total_count) else {
        return Page::empty(request, total_count);
    };
    // `start < total_count` so it fits in usize.
    let start = start as usize;
    let end = start.saturating_add(request.per_page as usize).min(items.len());

    Page {
        items: items[start..end].to_vec(),
        total_count,
        page: request.page,
        per_page: request.per_page,
    }
}

/// Windows a lazily fetched result set.
///
/// `count` returns the full total; `fetch(offset, limit)` loads only the
/// requested window and is skipped entirely when the page is out of range.
pub fn paginate_with<T, E>(
    request: PageRequest,
    count: impl FnOnce() -> Result<u64, E>,
    fetch: impl FnOnce(u32, u32) -> Result<Vec<T>, E>,
) -> Result<Page<T>, E> {
    let total_count = count()?;
    let Some(start) = window_start(request, total_count) else {
        return Ok(Page::empty(request, total_count));
    };
    let Ok(offset) = u32::try_from(start) else {
        return Ok(Page::empty(request, total_count));
    };

    let items = fetch(offset, request.per_page)?;
    Ok(Page {
        items,
        total_count,
        page: request.page,
        per_page: request.per_page,
    })
}

fn window_start(request: PageRequest, total_count: u64) -> Option<u64> {
    request.offset().filter(|offset| *offset < total_count)
}
