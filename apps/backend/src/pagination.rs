//! Offset pagination with optional search and sorting.
//!
//! Listing endpoints accept `page` and `limit` (both required, both at
//! least 1) plus optional `search`, `field` and `order` parameters.
//! Search is a case-insensitive substring match OR-ed across an
//! entity's declared searchable columns. Results come back in a fixed
//! envelope of `items`, `meta` and `links`, with the total counted in
//! a separate query so `totalPages` is exact.

use std::str::FromStr;

use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    Condition, ConnectionTrait, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::infra::db_errors::map_db_err;

/// Raw query parameters, before validation. Numbers arrive as strings
/// so that `page=abc` is our 400 rather than a deserializer rejection.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub field: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl From<SortOrder> for Order {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        }
    }
}

/// A validated page request.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
    pub search: Option<String>,
    pub field: Option<String>,
    pub order: SortOrder,
}

impl PageParams {
    /// Validate into a [`PageRequest`], accumulating every problem into
    /// one 400 instead of stopping at the first.
    pub fn validate(&self) -> Result<PageRequest, AppError> {
        let mut errors = Vec::new();

        let page = parse_positive("page", self.page.as_deref(), &mut errors);
        let limit = parse_positive("limit", self.limit.as_deref(), &mut errors);

        let order = match self.order.as_deref() {
            None | Some("asc") | Some("ASC") => SortOrder::Asc,
            Some("desc") | Some("DESC") => SortOrder::Desc,
            Some(_) => {
                errors.push("the 'order' parameter must be 'asc' or 'desc'".to_string());
                SortOrder::Asc
            }
        };

        if !errors.is_empty() {
            return Err(AppError::validation(errors));
        }

        Ok(PageRequest {
            // Both are Some when no errors accumulated.
            page: page.unwrap_or(1),
            limit: limit.unwrap_or(1),
            search: self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            field: self.field.clone(),
            order,
        })
    }
}

fn parse_positive(name: &str, value: Option<&str>, errors: &mut Vec<String>) -> Option<u64> {
    match value {
        None | Some("") => {
            errors.push(format!("the '{name}' parameter is required"));
            None
        }
        Some(raw) => match raw.parse::<u64>() {
            Ok(n) if n >= 1 => Some(n),
            _ => {
                errors.push(format!(
                    "the '{name}' parameter must be an integer greater than or equal to 1"
                ));
                None
            }
        },
    }
}

/// Per-entity pagination metadata: which columns `search` scans and
/// which column orders results when no `field` is given.
pub trait Paginated: EntityTrait {
    fn searchable_columns() -> Vec<Self::Column>;
    fn default_sort_column() -> Self::Column;
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total_items: u64,
    pub item_count: u64,
    pub items_per_page: u64,
    pub total_pages: u64,
    pub current_page: u64,
}

/// Relative navigation links. Inapplicable directions are empty
/// strings, not omitted keys.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PageLinks {
    pub first: String,
    pub previous: String,
    pub next: String,
    pub last: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
    pub links: PageLinks,
}

impl<T> Page<T> {
    /// Re-shape the items, keeping meta and links.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
            links: self.links,
        }
    }
}

/// Run a paginated query: count first, then fetch one page.
pub async fn paginate<C, E>(
    conn: &C,
    base: Select<E>,
    route: &str,
    req: &PageRequest,
) -> Result<Page<E::Model>, AppError>
where
    C: ConnectionTrait,
    E: Paginated,
    E::Model: Send + Sync,
    E::Column: FromStr,
{
    let mut query = base;

    if let Some(term) = &req.search {
        let needle = format!("%{}%", term.to_lowercase());
        let mut cond = Condition::any();
        for col in E::searchable_columns() {
            cond = cond.add(Expr::expr(Func::lower(Expr::col(col))).like(needle.clone()));
        }
        query = query.filter(cond);
    }

    let sort_col = match &req.field {
        Some(field) => E::Column::from_str(field)
            .map_err(|_| AppError::invalid(format!("unknown sort field '{field}'")))?,
        None => E::default_sort_column(),
    };

    // page and limit are only bounded below, so the offset can exceed
    // u64; fail fast before touching the store.
    let offset = (req.page - 1)
        .checked_mul(req.limit)
        .ok_or_else(|| AppError::invalid("the requested page is out of range"))?;

    let total_items = query
        .clone()
        .count(conn)
        .await
        .map_err(|e| AppError::from(map_db_err(e)))?;

    let items = query
        .order_by(sort_col, req.order.into())
        .offset(offset)
        .limit(req.limit)
        .all(conn)
        .await
        .map_err(|e| AppError::from(map_db_err(e)))?;

    let meta = build_meta(total_items, items.len() as u64, req.page, req.limit);
    let links = build_links(route, &meta);

    Ok(Page { items, meta, links })
}

fn build_meta(total_items: u64, item_count: u64, page: u64, limit: u64) -> PageMeta {
    PageMeta {
        total_items,
        item_count,
        items_per_page: limit,
        total_pages: total_items.div_ceil(limit),
        current_page: page,
    }
}

fn build_links(route: &str, meta: &PageMeta) -> PageLinks {
    let limit = meta.items_per_page;

    PageLinks {
        first: format!("{route}?limit={limit}"),
        previous: if meta.current_page > 1 {
            format!("{route}?page={}&limit={limit}", meta.current_page - 1)
        } else {
            String::new()
        },
        next: if meta.current_page < meta.total_pages {
            format!("{route}?page={}&limit={limit}", meta.current_page + 1)
        } else {
            String::new()
        },
        last: format!("{route}?page={}&limit={limit}", meta.total_pages),
    }
}
