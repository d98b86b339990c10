//! Pagination utilities for service layer
//!
//! Provides a simple `Pagination` struct and helpers to normalize inputs,
//! plus the `Page` envelope every list endpoint returns.

use serde::Serialize;

pub const MAX_PER_PAGE: u32 = 100;
pub const DEFAULT_PER_PAGE: u32 = 20;
/// Public artwork galleries show a 3x4 grid.
pub const GALLERY_PER_PAGE: u32 = 12;

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub per_page: u32,
}

impl Pagination {
    pub fn new(page: Option<u32>, per_page: Option<u32>, default_per_page: u32) -> Self {
        Self { page: page.unwrap_or(1), per_page: per_page.unwrap_or(default_per_page) }
    }

    /// Clamp to sane defaults and convert to `u64`
    pub fn normalize(self) -> (u64, u64) {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, MAX_PER_PAGE);
        ((page - 1) as u64, per_page as u64)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: DEFAULT_PER_PAGE } }
}

/// One page of a listing.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Cut one page out of an already filtered and sorted list. A page past
    /// the end is empty but still reports the real totals.
    pub fn from_vec(items: Vec<T>, pagination: Pagination) -> Self {
        let (idx, per) = pagination.normalize();
        let total = items.len() as u64;
        let total_pages = total.div_ceil(per);
        let items: Vec<T> = items
            .into_iter()
            .skip((idx * per) as usize)
            .take(per as usize)
            .collect();
        Self { items, page: idx as u32 + 1, per_page: per as u32, total, total_pages }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}
