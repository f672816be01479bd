//! # sea-orm-paginate
//!
//! Offset pagination for [SeaORM](https://www.sea-ql.org/SeaORM/) queries.
//!
//! Computes one page of results plus page metadata (current page, item
//! count, total items, total pages) and, when a base route is supplied,
//! `first`/`previous`/`next`/`last` navigation links for a REST listing
//! endpoint.
//!
//! ## Sources
//!
//! [`paginate`] accepts either kind of [`PageSource`]:
//!
//! - **Repository style**: a whole entity narrowed by an optional
//!   [`SearchFilter`] (condition, ordering, explicit skip/take overrides).
//! - **Query-builder style**: a caller-composed `Select`, including joins,
//!   grouping and custom conditions. The total is computed by wrapping the
//!   unpaged query in a `COUNT(*)` subquery, so join row multiplication and
//!   HAVING clauses are handled by the database, not re-derived here.
//!
//! [`paginate_raw`] returns the unmapped driver rows instead of entities;
//! [`paginate_raw_and_entities`] returns both side by side.
//!
//! ## Input handling
//!
//! `page` and `limit` are accepted loosely (numbers or query-string text).
//! Anything that does not resolve to a non-negative integer falls back to
//! the defaults (page 1, limit 10) with a `tracing` warning; invalid input
//! degrades, it never fails a call. Database errors are surfaced as
//! [`PaginateError`].

pub mod error;
pub mod options;
pub mod paginate;
pub mod pagination;

pub use error::{PaginateError, PaginateResult};
pub use options::{
    PageParam, PaginationOptions, PaginationType, RoutingLabels, DEFAULT_LIMIT, DEFAULT_PAGE,
};
pub use paginate::{paginate, paginate_raw, paginate_raw_and_entities, PageSource, SearchFilter};
pub use pagination::{PaginationLinks, PaginationMeta, PaginationResult};
