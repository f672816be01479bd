//! Pagination options and input resolution.

use serde::Deserialize;

use crate::pagination::PaginationMeta;

/// Page number used when the supplied `page` cannot be resolved.
pub const DEFAULT_PAGE: u64 = 1;
/// Page size used when the supplied `limit` cannot be resolved.
pub const DEFAULT_LIMIT: u64 = 10;

/// How `LIMIT`/`OFFSET` are placed on a query-builder source.
///
/// The two strategies behave differently when the caller's query already
/// carries row-shaping clauses of its own:
///
/// - [`LimitAndOffset`](Self::LimitAndOffset) sets `LIMIT`/`OFFSET` directly
///   on the query, overwriting any values the caller may have set.
/// - [`TakeAndSkip`](Self::TakeAndSkip) leaves the caller's query untouched
///   and slices the page from the fully materialized result set by wrapping
///   it as a subquery with an outer `LIMIT`/`OFFSET`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationType {
    #[default]
    LimitAndOffset,
    TakeAndSkip,
}

/// Raw `page`/`limit` value as supplied by the caller.
///
/// Query-string parameters usually arrive as text, so both numeric and
/// textual forms are accepted; the resolver coerces text to an integer and
/// falls back to the default on anything that is not a non-negative integer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PageParam {
    Number(i64),
    Text(String),
}

impl From<i64> for PageParam {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for PageParam {
    fn from(value: i32) -> Self {
        Self::Number(value as i64)
    }
}

impl From<u64> for PageParam {
    fn from(value: u64) -> Self {
        Self::Number(value as i64)
    }
}

impl From<u32> for PageParam {
    fn from(value: u32) -> Self {
        Self::Number(value as i64)
    }
}

impl From<&str> for PageParam {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for PageParam {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Query-string key names used when building navigation links.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoutingLabels {
    pub page_label: String,
    pub limit_label: String,
}

impl Default for RoutingLabels {
    fn default() -> Self {
        Self {
            page_label: "page".to_owned(),
            limit_label: "limit".to_owned(),
        }
    }
}

/// Options accepted by every pagination entry point.
///
/// `M` is the meta type of the produced page. It defaults to
/// [`PaginationMeta`]; a custom shape is produced either through
/// `meta_transformer` or through a `From<PaginationMeta>` impl on `M`.
#[derive(Debug, Clone)]
pub struct PaginationOptions<M = PaginationMeta> {
    /// 1-based page number. Default: 1
    pub page: PageParam,
    /// Page size. Default: 10
    pub limit: PageParam,
    /// Base path used to generate navigation links; no links without it
    pub route: Option<String>,
    pub pagination_type: PaginationType,
    /// Whether to run the count query at all. When `false` the resulting
    /// meta carries no `total_items`/`total_pages`. Default: `true`
    pub count_queries: bool,
    /// Reshapes the internal meta into `M`; `From<PaginationMeta>` is used
    /// when absent
    pub meta_transformer: Option<fn(PaginationMeta) -> M>,
    pub routing_labels: Option<RoutingLabels>,
}

impl<M> Default for PaginationOptions<M> {
    fn default() -> Self {
        Self {
            page: PageParam::Number(DEFAULT_PAGE as i64),
            limit: PageParam::Number(DEFAULT_LIMIT as i64),
            route: None,
            pagination_type: PaginationType::default(),
            count_queries: true,
            meta_transformer: None,
            routing_labels: None,
        }
    }
}

impl<M> PaginationOptions<M> {
    pub fn new(page: impl Into<PageParam>, limit: impl Into<PageParam>) -> Self {
        Self {
            page: page.into(),
            limit: limit.into(),
            ..Self::default()
        }
    }

    pub fn route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    pub fn pagination_type(mut self, pagination_type: PaginationType) -> Self {
        self.pagination_type = pagination_type;
        self
    }

    pub fn count_queries(mut self, count_queries: bool) -> Self {
        self.count_queries = count_queries;
        self
    }

    pub fn meta_transformer(mut self, transformer: fn(PaginationMeta) -> M) -> Self {
        self.meta_transformer = Some(transformer);
        self
    }

    pub fn routing_labels(mut self, labels: RoutingLabels) -> Self {
        self.routing_labels = Some(labels);
        self
    }
}

/// Fully resolved options shared by all strategies.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedOptions {
    pub page: u64,
    pub limit: u64,
    pub route: Option<String>,
    pub pagination_type: PaginationType,
    pub count_queries: bool,
}

pub(crate) fn resolve_options<M>(options: &PaginationOptions<M>) -> ResolvedOptions {
    ResolvedOptions {
        page: resolve_numeric(&options.page, "page", DEFAULT_PAGE),
        limit: resolve_numeric(&options.limit, "limit", DEFAULT_LIMIT),
        route: options.route.clone(),
        pagination_type: options.pagination_type,
        count_queries: options.count_queries,
    }
}

/// Coerce a raw parameter to a non-negative integer, falling back to the
/// default (with a warning) on anything else. Resolution never fails.
fn resolve_numeric(value: &PageParam, key: &str, default: u64) -> u64 {
    let resolved = match value {
        PageParam::Number(n) => Some(*n),
        PageParam::Text(s) => s.trim().parse::<i64>().ok(),
    };

    match resolved {
        Some(n) if n >= 0 => n as u64,
        _ => {
            tracing::warn!(
                key,
                ?value,
                ?resolved,
                default,
                "query parameter did not resolve to a non-negative integer, \
                 falling back to default"
            );
            default
        }
    }
}
