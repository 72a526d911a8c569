//! Table queries and RPC over the backend's REST table API.
//!
//! Filters are expressed as query-string operators (`column=eq.value`), reads pick
//! columns with `select`, and writes ask for the affected rows back with
//! `Prefer: return=representation`.

use std::fmt::Display;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::Backend;
use crate::error::{BackendError, Result};

/// Builder for one request against a table.
#[derive(Debug, Clone)]
pub struct Query {
    backend: Backend,
    table: String,
    params: Vec<(String, String)>,
}

impl Backend {
    /// Start a query against `table`.
    pub fn from(&self, table: &str) -> Query {
        Query {
            backend: self.clone(),
            table: table.to_string(),
            params: Vec::new(),
        }
    }

    /// Call a database function and decode its result.
    pub async fn rpc<T, A>(&self, function: &str, args: &A) -> Result<T>
    where
        T: DeserializeOwned,
        A: Serialize + ?Sized,
    {
        let url = self.endpoint(&format!("rest/v1/rpc/{function}"));
        Ok(self
            .send(self.request(Method::POST, &url).json(args))
            .await?
            .json()
            .await?)
    }
}

impl Query {
    fn set(mut self, key: &str, value: String) -> Self {
        self.params.retain(|(k, _)| k != key);
        self.params.push((key.to_string(), value));
        self
    }

    fn filter(mut self, column: &str, operator: &str, value: impl Display) -> Self {
        self.params
            .push((column.to_string(), format!("{operator}.{value}")));
        self
    }

    /// Columns to return; supports embedded resources (`*,author:profiles(*)`).
    pub fn select(self, columns: &str) -> Self {
        self.set("select", columns.replace(char::is_whitespace, ""))
    }

    pub fn eq(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "eq", value)
    }

    pub fn neq(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "neq", value)
    }

    pub fn gt(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "gt", value)
    }

    pub fn gte(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "gte", value)
    }

    pub fn lt(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "lt", value)
    }

    pub fn lte(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "lte", value)
    }

    /// Case-insensitive pattern match; `%` wildcards are accepted and rewritten.
    pub fn ilike(self, column: &str, pattern: &str) -> Self {
        self.filter(column, "ilike", pattern.replace('%', "*"))
    }

    pub fn not_null(self, column: &str) -> Self {
        self.filter(column, "not.is", "null")
    }

    /// Column value is one of `values`.
    pub fn is_in<I, V>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Display,
    {
        let list = values
            .into_iter()
            .map(|v| quote_list_item(&v.to_string()))
            .collect::<Vec<_>>()
            .join(",");
        self.filter(column, "in", format!("({list})"))
    }

    /// Raw disjunction, e.g. `title.ilike.*rock*,location.ilike.*rock*`.
    pub fn or(mut self, filters: &str) -> Self {
        self.params
            .push(("or".to_string(), format!("({filters})")));
        self
    }

    /// Append an ordering; later calls break ties of earlier ones.
    pub fn order(self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        let clause = format!("{column}.{direction}");
        let existing = self
            .params
            .iter()
            .find(|(k, _)| k == "order")
            .map(|(_, v)| v.clone());
        match existing {
            Some(prev) => self.set("order", format!("{prev},{clause}")),
            None => self.set("order", clause),
        }
    }

    pub fn limit(self, count: usize) -> Self {
        self.set("limit", count.to_string())
    }

    /// Inclusive row range, zero based.
    pub fn range(self, from: usize, to: usize) -> Self {
        let count = to.saturating_sub(from) + 1;
        self.set("offset", from.to_string())
            .set("limit", count.to_string())
    }

    /// Upsert conflict target.
    fn on_conflict(self, columns: &str) -> Self {
        self.set("on_conflict", columns.to_string())
    }

    /// The request URL this query resolves to.
    pub fn url(&self) -> Result<String> {
        let base = self.backend.endpoint(&format!("rest/v1/{}", self.table));
        if self.params.is_empty() {
            return Ok(base);
        }
        let query = serde_urlencoded::to_string(&self.params)?;
        Ok(format!("{base}?{query}"))
    }

    /// Fetch every matching row.
    pub async fn execute<T: DeserializeOwned>(self) -> Result<Vec<T>> {
        let url = self.url()?;
        Ok(self
            .backend
            .send(self.backend.request(Method::GET, &url))
            .await?
            .json()
            .await?)
    }

    /// Fetch exactly one row; zero rows is [`BackendError::NotFound`].
    pub async fn single<T: DeserializeOwned>(self) -> Result<T> {
        let url = self.url()?;
        Ok(self
            .backend
            .send(
                self.backend
                    .request(Method::GET, &url)
                    .header("Accept", "application/vnd.pgrst.object+json"),
            )
            .await?
            .json()
            .await?)
    }

    /// Fetch the first matching row, if any.
    pub async fn maybe_single<T: DeserializeOwned>(self) -> Result<Option<T>> {
        Ok(self.limit(1).execute::<T>().await?.into_iter().next())
    }

    /// Number of matching rows, without transferring them.
    pub async fn count(self) -> Result<u64> {
        let query = self.set("select", "*".to_string());
        let url = query.url()?;
        let response = query
            .backend
            .send(
                query
                    .backend
                    .request(Method::HEAD, &url)
                    .header("Prefer", "count=exact"),
            )
            .await?;
        let header = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| BackendError::Decode("missing Content-Range header".to_string()))?;
        parse_content_range_total(header)
            .ok_or_else(|| BackendError::Decode(format!("malformed Content-Range {header:?}")))
    }

    fn insert_request<R>(&self, rows: &R, prefer: &str) -> Result<RequestBuilder>
    where
        R: Serialize + ?Sized,
    {
        let url = self.url()?;
        Ok(self
            .backend
            .request(Method::POST, &url)
            .header("Prefer", prefer)
            .json(rows))
    }

    /// Insert one row (or a slice of rows) and return what was written.
    pub async fn insert<T, R>(self, rows: &R) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        R: Serialize + ?Sized,
    {
        let request = self.insert_request(rows, "return=representation")?;
        Ok(self.backend.send(request).await?.json().await?)
    }

    /// Insert without reading the rows back, for rows the caller may not be
    /// allowed to select (another user's notifications).
    pub async fn insert_only<R>(self, rows: &R) -> Result<()>
    where
        R: Serialize + ?Sized,
    {
        let request = self.insert_request(rows, "return=minimal")?;
        self.backend.send(request).await?;
        Ok(())
    }

    /// Insert or merge on the `on_conflict` columns.
    pub async fn upsert<T, R>(self, rows: &R, on_conflict: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        R: Serialize + ?Sized,
    {
        let query = self.on_conflict(on_conflict);
        let url = query.url()?;
        Ok(query
            .backend
            .send(
                query
                    .backend
                    .request(Method::POST, &url)
                    .header(
                        "Prefer",
                        "resolution=merge-duplicates,return=representation",
                    )
                    .json(rows),
            )
            .await?
            .json()
            .await?)
    }

    /// Patch every matching row and return the updated rows.
    pub async fn update<T, R>(self, patch: &R) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        R: Serialize + ?Sized,
    {
        if !self.has_filters() {
            return Err(BackendError::Api {
                status: 400,
                message: format!("refusing unfiltered update of {}", self.table),
            });
        }
        let url = self.url()?;
        Ok(self
            .backend
            .send(
                self.backend
                    .request(Method::PATCH, &url)
                    .header("Prefer", "return=representation")
                    .json(patch),
            )
            .await?
            .json()
            .await?)
    }

    /// Delete every matching row.
    pub async fn delete(self) -> Result<()> {
        if !self.has_filters() {
            return Err(BackendError::Api {
                status: 400,
                message: format!("refusing unfiltered delete of {}", self.table),
            });
        }
        let url = self.url()?;
        self.backend
            .send(
                self.backend
                    .request(Method::DELETE, &url)
                    .header("Prefer", "return=minimal"),
            )
            .await?;
        Ok(())
    }

    fn has_filters(&self) -> bool {
        self.params.iter().any(|(k, _)| {
            !matches!(
                k.as_str(),
                "select" | "order" | "limit" | "offset" | "on_conflict"
            )
        })
    }
}

/// Quote an `in.(...)` list item when it contains list syntax.
fn quote_list_item(item: &str) -> String {
    if item.contains([',', '(', ')', '"', ' ']) {
        format!("\"{}\"", item.replace('"', "\\\""))
    } else {
        item.to_string()
    }
}

/// Total from a `Content-Range` header such as `0-24/318` or `*/0`.
pub(crate) fn parse_content_range_total(header: &str) -> Option<u64> {
    header.rsplit_once('/')?.1.trim().parse().ok()
}

/// Check a query's base URL and its decoded parameters, in order.
#[cfg(test)]
pub(crate) fn assert_query(query: &Query, base: &str, expected: &[(&str, &str)]) {
    let url = query.url().unwrap();
    let (actual_base, encoded) = url.split_once('?').unwrap_or((url.as_str(), ""));
    assert_eq!(actual_base, base);
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(encoded).unwrap();
    let pairs: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    assert_eq!(pairs, expected);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;

    fn backend() -> Backend {
        Backend::new(BackendConfig::new("https://demo.supabase.co", "anon"))
    }

    #[test]
    fn test_select_with_filters_and_order() {
        let query = backend()
            .from("events")
            .select("*, organizer:profiles(id, name)")
            .eq("category", "Música")
            .gte("date", "2025-01-01T00:00:00Z")
            .order("date", true)
            .order("title", true)
            .limit(20);
        assert_query(
            &query,
            "https://demo.supabase.co/rest/v1/events",
            &[
                ("select", "*,organizer:profiles(id,name)"),
                ("category", "eq.Música"),
                ("date", "gte.2025-01-01T00:00:00Z"),
                ("order", "date.asc,title.asc"),
                ("limit", "20"),
            ],
        );
    }

    #[test]
    fn test_values_are_percent_encoded() {
        let url = backend()
            .from("events")
            .eq("category", "Música & Arte")
            .url()
            .unwrap();
        assert_eq!(
            url,
            "https://demo.supabase.co/rest/v1/events?category=eq.M%C3%BAsica+%26+Arte"
        );
    }

    #[test]
    fn test_no_params_is_bare_table_url() {
        assert_eq!(
            backend().from("events").url().unwrap(),
            "https://demo.supabase.co/rest/v1/events"
        );
    }

    #[test]
    fn test_select_replaces_previous_select() {
        let query = backend().from("profiles").select("*").select("id");
        assert_query(&query, "https://demo.supabase.co/rest/v1/profiles", &[("select", "id")]);
    }

    #[test]
    fn test_ilike_and_or() {
        let query = backend()
            .from("profiles")
            .ilike("name", "%ana%")
            .or("title.ilike.*rock*,location.ilike.*rock*");
        assert_query(
            &query,
            "https://demo.supabase.co/rest/v1/profiles",
            &[
                ("name", "ilike.*ana*"),
                ("or", "(title.ilike.*rock*,location.ilike.*rock*)"),
            ],
        );
    }

    #[test]
    fn test_in_list_quotes_items_with_syntax() {
        let query = backend()
            .from("events")
            .is_in("category", ["Música", "Arte, Cultura"]);
        assert_query(
            &query,
            "https://demo.supabase.co/rest/v1/events",
            &[("category", "in.(Música,\"Arte, Cultura\")")],
        );
    }

    #[test]
    fn test_range_sets_offset_and_limit() {
        let query = backend().from("posts").limit(5).range(20, 39);
        assert_query(
            &query,
            "https://demo.supabase.co/rest/v1/posts",
            &[("offset", "20"), ("limit", "20")],
        );
    }

    #[test]
    fn test_insert_prefer_header() {
        let query = backend().from("notifications");
        let request = query
            .insert_request(&serde_json::json!({ "read": false }), "return=minimal")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.headers()["Prefer"], "return=minimal");
        assert_eq!(
            request.url().as_str(),
            "https://demo.supabase.co/rest/v1/notifications"
        );
    }

    #[test]
    fn test_filters_are_detected() {
        assert!(!backend().from("posts").select("*").limit(1).has_filters());
        assert!(backend().from("posts").eq("id", 1).has_filters());
    }

    #[test]
    fn test_content_range_total() {
        assert_eq!(parse_content_range_total("0-24/318"), Some(318));
        assert_eq!(parse_content_range_total("*/0"), Some(0));
        assert_eq!(parse_content_range_total("0-24/*"), None);
        assert_eq!(parse_content_range_total("garbage"), None);
    }
}
