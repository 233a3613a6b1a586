//! Deterministic page slicing with clamped page numbers and navigation links.
//!
//! Page numbers are 1-based and silently corrected into `[1, total_pages]`;
//! an empty result set is reported as page 1 of 1 with no items. Navigation
//! references are reconstructable request paths carrying `page` and
//! `page_size` query parameters, present only when the neighbour page exists.

use sea_orm::{ConnectionTrait, EntityTrait, FromQueryResult, PaginatorTrait, Select};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::errors::ServiceError;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Query parameters shared by every list endpoint.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PageParams {
    /// 1-based page number; out-of-range values are clamped, not rejected
    #[serde(default = "default_page")]
    pub page: i64,
    /// Items per page, capped at 100
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE as i64
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl PageParams {
    /// Effective page size: at least 1, at most [`MAX_PAGE_SIZE`].
    pub fn effective_page_size(&self) -> u64 {
        self.page_size.clamp(1, MAX_PAGE_SIZE as i64) as u64
    }
}

/// Pagination metadata block attached to list responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PageMeta {
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    pub page_size: u64,
    pub current_page: u64,
    pub total_pages: u64,
}

impl PageMeta {
    fn new(count: u64, current_page: u64, total_pages: u64, page_size: u64, path: &str) -> Self {
        let link = |page: u64| format!("{}?page={}&page_size={}", path, page, page_size);
        let next = (current_page < total_pages).then(|| link(current_page + 1));
        let previous = (current_page > 1).then(|| link(current_page - 1));
        Self {
            count,
            next,
            previous,
            page_size,
            current_page,
            total_pages: total_pages.max(1),
        }
    }
}

/// Clamp a requested 1-based page into the valid range for `total_pages`.
fn resolve_page(requested: i64, total_pages: u64) -> u64 {
    let last = total_pages.max(1);
    if requested < 1 {
        1
    } else {
        (requested as u64).min(last)
    }
}

/// Slice an ordered query into the requested page, decoding rows into `M`
/// (the entity model, or a joined view deriving `FromQueryResult`).
///
/// The caller is responsible for applying a stable order to `query`; given
/// that, the same inputs always yield the same slice and metadata.
pub async fn paginate<E, M, C>(
    query: Select<E>,
    db: &C,
    params: &PageParams,
    path: &str,
) -> Result<(Vec<M>, PageMeta), ServiceError>
where
    E: EntityTrait,
    M: FromQueryResult + Send + Sync,
    C: ConnectionTrait,
{
    let page_size = params.effective_page_size();
    let paginator = query.into_model::<M>().paginate(db, page_size);
    let counts = paginator.num_items_and_pages().await?;

    let current = resolve_page(params.page, counts.number_of_pages);
    let items = paginator.fetch_page(current - 1).await?;

    let meta = PageMeta::new(
        counts.number_of_items,
        current,
        counts.number_of_pages.max(1),
        page_size,
        path,
    );
    Ok((items, meta))
}
