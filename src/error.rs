//! Error types

use thiserror::Error;

/// Failure raised by a pagination call.
///
/// Invalid `page`/`limit` inputs never end up here; the option resolver
/// falls back to defaults and logs a warning instead. The only way a call
/// fails is the underlying database reporting an error while fetching the
/// page or computing the total count.
#[derive(Debug, Error)]
pub enum PaginateError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

pub type PaginateResult<T> = Result<T, PaginateError>;
