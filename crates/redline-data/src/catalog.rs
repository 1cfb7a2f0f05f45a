//! Catalog service client.
//!
//! Responses are validated once here; everything downstream works with
//! [`CatalogItem`]s priced in cents.

use redline_commerce::catalog::CatalogItem;
use redline_commerce::ids::CatalogItemId;
use redline_commerce::money::{Currency, Money};
use redline_commerce::search::{CatalogPage, CatalogQuery, Pagination};
use serde::Deserialize;

use crate::client::{FetchClient, FetchError};
use crate::transport::{HttpRequest, HttpResponse};

/// Body of a catalog response: a page of items or an error document.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogResponse {
    Data {
        data: Vec<WireItem>,
        #[serde(default)]
        total: Option<u64>,
    },
    Error {
        error: ApiError,
    },
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

/// Item as the catalog service sends it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireItem {
    id: i64,
    name: String,
    #[serde(default)]
    sku: String,
    price: WirePrice,
    #[serde(default)]
    brand: Option<String>,
    #[serde(default, alias = "in_stock")]
    in_stock: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WirePrice {
    Text(String),
    Number(serde_json::Number),
}

impl WireItem {
    fn into_item(self, currency: Currency) -> Option<CatalogItem> {
        let text = match &self.price {
            WirePrice::Text(s) => s.clone(),
            WirePrice::Number(n) => n.to_string(),
        };
        let price = match Money::parse_decimal(&text, currency) {
            Ok(price) => price,
            Err(e) => {
                tracing::warn!(item_id = self.id, error = %e, "skipping catalog item with unreadable price");
                return None;
            }
        };
        let mut item = CatalogItem::new(CatalogItemId(self.id), self.name, self.sku, price);
        item.brand = self.brand.filter(|b| !b.trim().is_empty());
        item.in_stock = self.in_stock.unwrap_or(true);
        Some(item)
    }
}

/// Client for the third-party catalog service.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    fetch: FetchClient,
    base_url: String,
    api_key: Option<String>,
    currency: Currency,
}

impl CatalogClient {
    pub fn new(fetch: FetchClient, base_url: impl Into<String>) -> Self {
        Self {
            fetch,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            currency: Currency::USD,
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into()).filter(|k| !k.is_empty());
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// URL for a listing query.
    pub fn search_url(&self, query: &CatalogQuery) -> String {
        let qs = query.to_params().to_query_string();
        if qs.is_empty() {
            format!("{}/items", self.base_url)
        } else {
            format!("{}/items?{}", self.base_url, qs)
        }
    }

    /// Fetch one page of items matching `query`.
    pub async fn search(&self, query: &CatalogQuery) -> Result<CatalogPage<CatalogItem>, FetchError> {
        let request = self.request(self.search_url(query));
        let response = self.fetch.send(&request).await?;
        let (items, total) = self.parse(&request, &response)?;
        let total = total.unwrap_or(items.len() as u64);
        tracing::debug!(url = %request.url, items = items.len(), total, "catalog page fetched");
        Ok(CatalogPage::new(items, Pagination::for_query(query, total)))
    }

    /// Fetch one item by id; `None` when the catalog does not know it.
    pub async fn item(&self, id: CatalogItemId) -> Result<Option<CatalogItem>, FetchError> {
        let request = self.request(format!("{}/items/{}", self.base_url, id));
        let response = self.fetch.send(&request).await?;
        if response.status == 404 {
            return Ok(None);
        }
        let (items, _) = self.parse(&request, &response)?;
        Ok(items.into_iter().find(|item| item.id == id))
    }

    fn request(&self, url: String) -> HttpRequest {
        let request = HttpRequest::get(url).with_header("Accept", "application/json");
        match &self.api_key {
            Some(key) => request.with_bearer(key),
            None => request,
        }
    }

    fn parse(&self, request: &HttpRequest, response: &HttpResponse) -> Result<(Vec<CatalogItem>, Option<u64>), FetchError> {
        match serde_json::from_slice::<CatalogResponse>(&response.body) {
            Ok(CatalogResponse::Error { error }) => Err(FetchError::Api {
                message: error.message,
                code: error.code,
            }),
            Ok(CatalogResponse::Data { data, total }) if response.is_success() => {
                let items = data
                    .into_iter()
                    .filter_map(|item| item.into_item(self.currency))
                    .collect();
                Ok((items, total))
            }
            Ok(CatalogResponse::Data { .. }) => Err(FetchError::Http {
                status: response.status,
                url: request.url.clone(),
            }),
            Err(_) if !response.is_success() => Err(FetchError::Http {
                status: response.status,
                url: request.url.clone(),
            }),
            Err(e) => Err(FetchError::Deserialization(e.to_string())),
        }
    }
}
