//! Page assembly: the result object, its metadata and navigation links.

use serde::Serialize;
use utoipa::ToSchema;

use crate::options::{ResolvedOptions, RoutingLabels};

/// Metadata describing one page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaginationMeta {
    /// Number of items actually on this page, never the requested limit
    pub item_count: u64,
    /// Total matching items across all pages; `None` when counting was
    /// disabled via `count_queries`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_items: Option<u64>,
    pub items_per_page: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
    pub current_page: u64,
}

/// Navigation links for a REST listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaginationLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
}

/// One page of results plus metadata and optional navigation links.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginationResult<T, M = PaginationMeta> {
    pub items: Vec<T>,
    pub meta: M,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<PaginationLinks>,
}

/// Assemble the result object. Pure and infallible: no I/O happens here.
pub(crate) fn create_pagination<T, M>(
    items: Vec<T>,
    total_items: Option<u64>,
    resolved: &ResolvedOptions,
    meta_transformer: Option<fn(PaginationMeta) -> M>,
    routing_labels: Option<&RoutingLabels>,
) -> PaginationResult<T, M>
where
    M: From<PaginationMeta>,
{
    let total_pages = total_items.map(|total| total_pages_for(total, resolved.limit));

    // links require both a route and a known total
    let links = match (&resolved.route, total_pages) {
        (Some(route), Some(total_pages)) => {
            let default_labels = RoutingLabels::default();
            let labels = routing_labels.unwrap_or(&default_labels);
            Some(create_links(
                route,
                resolved.page,
                resolved.limit,
                total_pages,
                labels,
            ))
        }
        _ => None,
    };

    let meta = PaginationMeta {
        item_count: items.len() as u64,
        total_items,
        items_per_page: resolved.limit,
        total_pages,
        current_page: resolved.page,
    };
    let meta = match meta_transformer {
        Some(transform) => transform(meta),
        None => M::from(meta),
    };

    PaginationResult { items, meta, links }
}

fn total_pages_for(total_items: u64, limit: u64) -> u64 {
    if limit == 0 {
        0
    } else {
        total_items.div_ceil(limit)
    }
}

fn create_links(
    route: &str,
    current_page: u64,
    limit: u64,
    total_pages: u64,
    labels: &RoutingLabels,
) -> PaginationLinks {
    let sep = if route.contains('?') { '&' } else { '?' };
    let page_label = &labels.page_label;
    let limit_label = &labels.limit_label;

    PaginationLinks {
        first: Some(format!("{route}{sep}{limit_label}={limit}")),
        previous: (current_page > 1).then(|| {
            format!(
                "{route}{sep}{page_label}={}&{limit_label}={limit}",
                current_page - 1
            )
        }),
        next: (current_page < total_pages).then(|| {
            format!(
                "{route}{sep}{page_label}={}&{limit_label}={limit}",
                current_page + 1
            )
        }),
        last: (total_pages > 0)
            .then(|| format!("{route}{sep}{page_label}={total_pages}&{limit_label}={limit}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::PaginationType;

    fn resolved(page: u64, limit: u64, route: Option<&str>) -> ResolvedOptions {
        ResolvedOptions {
            page,
            limit,
            route: route.map(str::to_owned),
            pagination_type: PaginationType::LimitAndOffset,
            count_queries: true,
        }
    }

    fn assemble(
        items: Vec<i32>,
        total_items: Option<u64>,
        resolved: &ResolvedOptions,
    ) -> PaginationResult<i32> {
        create_pagination(items, total_items, resolved, None, None)
    }

    #[test]
    fn meta_reflects_actual_item_count() {
        let page = assemble(vec![1, 2, 3], Some(10), &resolved(1, 5, None));
        assert_eq!(page.meta.item_count, 3);
        assert_eq!(page.meta.items_per_page, 5);
        assert_eq!(page.meta.current_page, 1);
        assert_eq!(page.meta.total_items, Some(10));
        assert_eq!(page.meta.total_pages, Some(2));
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = assemble(vec![1, 2, 3], Some(10), &resolved(1, 3, None));
        assert_eq!(page.meta.total_pages, Some(4));
    }

    #[test]
    fn total_pages_is_zero_for_empty_result() {
        let page = assemble(vec![], Some(0), &resolved(1, 10, None));
        assert_eq!(page.meta.total_pages, Some(0));
    }

    #[test]
    fn zero_limit_does_not_divide_by_zero() {
        let page = assemble(vec![], Some(10), &resolved(1, 0, None));
        assert_eq!(page.meta.total_pages, Some(0));
    }

    #[test]
    fn counts_absent_when_counting_disabled() {
        let page = assemble(vec![1, 2], None, &resolved(1, 10, None));
        assert_eq!(page.meta.total_items, None);
        assert_eq!(page.meta.total_pages, None);
    }

    #[test]
    fn no_links_without_route() {
        let page = assemble(vec![1], Some(1), &resolved(1, 10, None));
        assert!(page.links.is_none());
    }

    #[test]
    fn no_links_without_total() {
        let page = assemble(vec![1], None, &resolved(1, 10, Some("/api/items")));
        assert!(page.links.is_none());
    }

    #[test]
    fn links_on_a_middle_page() {
        let page = assemble(vec![1, 2, 3], Some(10), &resolved(2, 3, Some("/api/items")));
        let links = page.links.unwrap();
        assert_eq!(links.first.as_deref(), Some("/api/items?limit=3"));
        assert_eq!(links.previous.as_deref(), Some("/api/items?page=1&limit=3"));
        assert_eq!(links.next.as_deref(), Some("/api/items?page=3&limit=3"));
        assert_eq!(links.last.as_deref(), Some("/api/items?page=4&limit=3"));
    }

    #[test]
    fn first_page_has_no_previous_and_last_page_has_no_next() {
        let first = assemble(vec![1], Some(2), &resolved(1, 1, Some("/items")));
        assert!(first.links.as_ref().unwrap().previous.is_none());

        let last = assemble(vec![1], Some(2), &resolved(2, 1, Some("/items")));
        assert!(last.links.as_ref().unwrap().next.is_none());
    }

    #[test]
    fn empty_result_has_no_last_link() {
        let page = assemble(vec![], Some(0), &resolved(1, 10, Some("/items")));
        let links = page.links.unwrap();
        assert!(links.last.is_none());
        assert!(links.next.is_none());
        assert_eq!(links.first.as_deref(), Some("/items?limit=10"));
    }

    #[test]
    fn route_with_query_string_appends_with_ampersand() {
        let page = assemble(
            vec![1],
            Some(10),
            &resolved(2, 5, Some("/api/items?shelved=true")),
        );
        let links = page.links.unwrap();
        assert_eq!(
            links.next.as_deref(),
            Some("/api/items?shelved=true&page=3&limit=5")
        );
    }

    #[test]
    fn custom_routing_labels_rename_query_keys() {
        let labels = RoutingLabels {
            page_label: "p".to_owned(),
            limit_label: "per_page".to_owned(),
        };
        let page: PaginationResult<i32> =
            create_pagination(vec![1], Some(10), &resolved(2, 5, Some("/items")), None, Some(&labels));
        let links = page.links.unwrap();
        assert_eq!(links.next.as_deref(), Some("/items?p=3&per_page=5"));
        assert_eq!(links.first.as_deref(), Some("/items?per_page=5"));
    }

    #[test]
    fn meta_transformer_reshapes_the_meta() {
        #[derive(Debug, PartialEq)]
        struct Slim {
            page: u64,
            pages: u64,
        }

        impl From<PaginationMeta> for Slim {
            fn from(meta: PaginationMeta) -> Self {
                Self {
                    page: meta.current_page,
                    pages: meta.total_pages.unwrap_or(0),
                }
            }
        }

        // via the transformer function
        let page: PaginationResult<i32, Slim> = create_pagination(
            vec![1],
            Some(10),
            &resolved(2, 5, None),
            Some(|meta| Slim {
                page: meta.current_page,
                pages: meta.total_pages.unwrap_or(0) + 100,
            }),
            None,
        );
        assert_eq!(page.meta, Slim { page: 2, pages: 102 });

        // via From when no transformer is given
        let page: PaginationResult<i32, Slim> =
            create_pagination(vec![1], Some(10), &resolved(2, 5, None), None, None);
        assert_eq!(page.meta, Slim { page: 2, pages: 2 });
    }

    #[test]
    fn serializes_without_absent_fields() {
        let page = assemble(vec![1, 2], None, &resolved(1, 10, None));
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["items"], serde_json::json!([1, 2]));
        assert_eq!(value["meta"]["item_count"], 2);
        assert!(value["meta"].get("total_items").is_none());
        assert!(value["meta"].get("total_pages").is_none());
        assert!(value.get("links").is_none());
    }
}
