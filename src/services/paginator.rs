//! Offset pagination over TestRail list endpoints.
//!
//! TestRail list responses wrap their items in a named field
//! (`{"projects": [...], "_links": {...}}`). Pages are requested until one
//! comes back shorter than [`PAGE_SIZE`]; the `size`/`_links` metadata is
//! never consulted.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::TestManagementClient;

/// Items requested per page; TestRail's maximum.
pub const PAGE_SIZE: usize = 250;

/// Fetch every item of a paginated endpoint.
///
/// `endpoint` may already carry parameters (`get_plans/3&milestone_id=5`);
/// `&limit=..&offset=..` is appended. A page without `items_field`
/// counts as empty. Client errors propagate unchanged.
pub async fn fetch_all<C>(client: &C, endpoint: &str, items_field: &str) -> DomainResult<Vec<Value>>
where
    C: TestManagementClient + ?Sized,
{
    let mut items = Vec::new();
    let mut offset = 0;

    loop {
        let page_endpoint = format!("{endpoint}&limit={PAGE_SIZE}&offset={offset}");
        let mut page = client.fetch(&page_endpoint).await?;

        let page_items = match page.get_mut(items_field).map(Value::take) {
            Some(Value::Array(values)) => values,
            _ => Vec::new(),
        };
        let page_len = page_items.len();
        items.extend(page_items);

        tracing::trace!(endpoint, offset, page_len, "fetched page");

        if page_len < PAGE_SIZE {
            break;
        }
        offset += PAGE_SIZE;
    }

    Ok(items)
}

/// [`fetch_all`], deserializing each item into `T`.
pub async fn fetch_all_as<T, C>(client: &C, endpoint: &str, items_field: &str) -> DomainResult<Vec<T>>
where
    T: DeserializeOwned,
    C: TestManagementClient + ?Sized,
{
    fetch_all(client, endpoint, items_field)
        .await?
        .into_iter()
        .map(|item| {
            serde_json::from_value(item).map_err(|e| {
                DomainError::SerializationError(format!("{endpoint} {items_field} item: {e}"))
            })
        })
        .collect()
}
