//! Pagination strategies over SeaORM sources.
//!
//! Two strategies sit behind [`paginate`]: a repository-style one working on
//! a whole entity with an optional [`SearchFilter`], and a query-builder one
//! working on a caller-composed [`Select`]. [`paginate_raw`] and
//! [`paginate_raw_and_entities`] are query-builder variants that expose the
//! unmapped driver rows.

use sea_orm::sea_query::{Alias, Asterisk, Expr, SelectStatement};
use sea_orm::{
    Condition, ConnectionTrait, EntityTrait, FromQueryResult, Order, QueryFilter, QueryOrder,
    QueryResult, QuerySelect, QueryTrait, Select,
};

use crate::error::PaginateResult;
use crate::options::{resolve_options, PaginationOptions, PaginationType, ResolvedOptions};
use crate::pagination::{create_pagination, PaginationMeta, PaginationResult};

/// Search filter for the repository strategy.
///
/// `condition` and `order_by` narrow and order the page the usual way.
/// `skip`/`take`, when set, override the offset and page size computed from
/// the resolved `page`/`limit`: the filter wins over the paging options on
/// collision, as callers of `find`-style APIs expect explicit find options
/// to take precedence.
#[derive(Debug, Clone)]
pub struct SearchFilter<E: EntityTrait> {
    pub condition: Option<Condition>,
    pub order_by: Vec<(E::Column, Order)>,
    pub skip: Option<u64>,
    pub take: Option<u64>,
}

impl<E: EntityTrait> Default for SearchFilter<E> {
    fn default() -> Self {
        Self {
            condition: None,
            order_by: Vec::new(),
            skip: None,
            take: None,
        }
    }
}

impl<E: EntityTrait> SearchFilter<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn order_by(mut self, column: E::Column, order: Order) -> Self {
        self.order_by.push((column, order));
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn take(mut self, take: u64) -> Self {
        self.take = Some(take);
        self
    }
}

impl<E: EntityTrait> From<Condition> for SearchFilter<E> {
    fn from(condition: Condition) -> Self {
        Self::new().condition(condition)
    }
}

/// The two kinds of sources [`paginate`] accepts.
///
/// A closed dispatch: either whole-entity access with an optional search
/// filter (repository style), or a caller-composed query.
#[derive(Debug, Clone)]
pub enum PageSource<E: EntityTrait> {
    Repository(SearchFilter<E>),
    Query(Select<E>),
}

impl<E: EntityTrait> From<SearchFilter<E>> for PageSource<E> {
    fn from(filter: SearchFilter<E>) -> Self {
        Self::Repository(filter)
    }
}

impl<E: EntityTrait> From<Select<E>> for PageSource<E> {
    fn from(query: Select<E>) -> Self {
        Self::Query(query)
    }
}

impl<E: EntityTrait> From<Condition> for PageSource<E> {
    fn from(condition: Condition) -> Self {
        Self::Repository(condition.into())
    }
}

/// Paginate a repository-style or query-builder source into mapped entities.
///
/// Page and limit inputs that do not resolve to non-negative integers fall
/// back to their defaults (1 and 10) with a logged warning; the call itself
/// only fails when the database does.
pub async fn paginate<C, E, M>(
    db: &C,
    source: impl Into<PageSource<E>>,
    options: PaginationOptions<M>,
) -> PaginateResult<PaginationResult<E::Model, M>>
where
    C: ConnectionTrait,
    E: EntityTrait,
    M: From<PaginationMeta>,
{
    match source.into() {
        PageSource::Repository(filter) => paginate_repository(db, filter, options).await,
        PageSource::Query(query) => paginate_query_builder(db, query, options).await,
    }
}

/// Paginate a query into unmapped driver rows.
pub async fn paginate_raw<C, E, M>(
    db: &C,
    query: Select<E>,
    options: PaginationOptions<M>,
) -> PaginateResult<PaginationResult<QueryResult, M>>
where
    C: ConnectionTrait,
    E: EntityTrait,
    M: From<PaginationMeta>,
{
    let resolved = resolve_options(&options);

    let rows = fetch_page_rows(db, &query, &resolved).await?;
    let total_items = resolve_total(db, query, &resolved).await?;

    Ok(create_pagination(
        rows,
        total_items,
        &resolved,
        options.meta_transformer,
        options.routing_labels.as_ref(),
    ))
}

/// Paginate a query into mapped entities and hand back the driver rows they
/// were mapped from alongside the page.
pub async fn paginate_raw_and_entities<C, E, M>(
    db: &C,
    query: Select<E>,
    options: PaginationOptions<M>,
) -> PaginateResult<(PaginationResult<E::Model, M>, Vec<QueryResult>)>
where
    C: ConnectionTrait,
    E: EntityTrait,
    M: From<PaginationMeta>,
{
    let resolved = resolve_options(&options);

    let rows = fetch_page_rows(db, &query, &resolved).await?;
    let items = map_models::<E>(&rows)?;
    let total_items = resolve_total(db, query, &resolved).await?;

    let page = create_pagination(
        items,
        total_items,
        &resolved,
        options.meta_transformer,
        options.routing_labels.as_ref(),
    );
    Ok((page, rows))
}

async fn paginate_repository<C, E, M>(
    db: &C,
    filter: SearchFilter<E>,
    options: PaginationOptions<M>,
) -> PaginateResult<PaginationResult<E::Model, M>>
where
    C: ConnectionTrait,
    E: EntityTrait,
    M: From<PaginationMeta>,
{
    let resolved = resolve_options(&options);

    // page 0 short-circuits to an empty page without touching the database
    if resolved.page < 1 {
        return Ok(create_pagination(
            Vec::new(),
            Some(0),
            &resolved,
            options.meta_transformer,
            options.routing_labels.as_ref(),
        ));
    }

    let mut query = E::find();
    if let Some(condition) = filter.condition.clone() {
        query = query.filter(condition);
    }
    for (column, order) in &filter.order_by {
        query = query.order_by(*column, order.clone());
    }

    let offset = filter
        .skip
        .unwrap_or_else(|| resolved.limit.saturating_mul(resolved.page - 1));
    let page_size = filter.take.unwrap_or(resolved.limit);

    let items = query.offset(offset).limit(page_size).all(db).await?;

    let total_items = if resolved.count_queries {
        // the count sees only the filter, never the paging or ordering
        let mut unpaged = E::find();
        if let Some(condition) = filter.condition {
            unpaged = unpaged.filter(condition);
        }
        Some(count_query(db, unpaged.into_query()).await?)
    } else {
        None
    };

    Ok(create_pagination(
        items,
        total_items,
        &resolved,
        options.meta_transformer,
        options.routing_labels.as_ref(),
    ))
}

async fn paginate_query_builder<C, E, M>(
    db: &C,
    query: Select<E>,
    options: PaginationOptions<M>,
) -> PaginateResult<PaginationResult<E::Model, M>>
where
    C: ConnectionTrait,
    E: EntityTrait,
    M: From<PaginationMeta>,
{
    let resolved = resolve_options(&options);

    let rows = fetch_page_rows(db, &query, &resolved).await?;
    let items = map_models::<E>(&rows)?;
    let total_items = resolve_total(db, query, &resolved).await?;

    Ok(create_pagination(
        items,
        total_items,
        &resolved,
        options.meta_transformer,
        options.routing_labels.as_ref(),
    ))
}

/// Run the page slice of `query` and return the driver rows.
async fn fetch_page_rows<C, E>(
    db: &C,
    query: &Select<E>,
    resolved: &ResolvedOptions,
) -> PaginateResult<Vec<QueryResult>>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let statement = paged_statement(query.clone().into_query(), resolved);
    let backend = db.get_database_backend();
    Ok(db.query_all(backend.build(&statement)).await?)
}

fn map_models<E: EntityTrait>(rows: &[QueryResult]) -> PaginateResult<Vec<E::Model>> {
    rows.iter()
        .map(|row| E::Model::from_query_result(row, "").map_err(Into::into))
        .collect()
}

/// Total row count of the unpaged query, when counting is enabled.
async fn resolve_total<C, E>(
    db: &C,
    query: Select<E>,
    resolved: &ResolvedOptions,
) -> PaginateResult<Option<u64>>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    if resolved.count_queries {
        Ok(Some(count_query(db, query.into_query()).await?))
    } else {
        Ok(None)
    }
}

/// Apply the page slice to a statement according to the pagination type.
fn paged_statement(mut query: SelectStatement, resolved: &ResolvedOptions) -> SelectStatement {
    let offset = resolved.limit.saturating_mul(resolved.page.saturating_sub(1));
    match resolved.pagination_type {
        PaginationType::LimitAndOffset => {
            query.limit(resolved.limit).offset(offset);
            query
        }
        // the caller's query stays intact; the page is sliced from its
        // materialized result set
        PaginationType::TakeAndSkip => SelectStatement::new()
            .column(Asterisk)
            .from_subquery(query, Alias::new("paged"))
            .limit(resolved.limit)
            .offset(offset)
            .to_owned(),
    }
}

/// `SELECT COUNT(*) AS "value" FROM (<query without LIMIT/OFFSET>)`.
///
/// Wrapping the cleared query as a subquery keeps every WHERE / HAVING /
/// GROUP BY / join clause intact without re-deriving the clause set, and the
/// statement carries its own bound parameters into the outer query.
fn count_statement(mut query: SelectStatement) -> SelectStatement {
    query.reset_limit().reset_offset();
    SelectStatement::new()
        .expr_as(Expr::cust("COUNT(*)"), Alias::new("value"))
        .from_subquery(query, Alias::new("paged_rows"))
        .to_owned()
}

/// Count the rows `query` would produce without pagination. Works on its
/// own statement, so the caller's builder is never mutated.
async fn count_query<C>(db: &C, query: SelectStatement) -> PaginateResult<u64>
where
    C: ConnectionTrait,
{
    let statement = count_statement(query);
    let backend = db.get_database_backend();

    let total = match db.query_one(backend.build(&statement)).await? {
        Some(row) => row.try_get::<i64>("", "value")? as u64,
        None => 0,
    };
    Ok(total)
}
