//! Wire types returned by the search endpoint

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::query::SearchQuery;
use crate::wire::null_as_default;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerUser {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerSummary {
    pub user_id: i64,
    #[serde(default)]
    pub seller_type: Option<String>,
    #[serde(default)]
    pub users: Option<SellerUser>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandRef {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// A product row as listed by the search endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchItem {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: Decimal,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub seller_id: Option<i64>,
    #[serde(default)]
    pub is_promoted: Option<bool>,
    #[serde(default)]
    pub sellers: Option<SellerSummary>,
    #[serde(default)]
    pub brands: Option<BrandRef>,
    #[serde(default)]
    pub primary_image: Option<String>,
}

/// Offset/limit pagination window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
    #[serde(rename = "hasMore")]
    pub has_more: bool,
}

impl Pagination {
    pub fn empty(limit: u32) -> Self {
        Self {
            total: 0,
            limit,
            offset: 0,
            has_more: false,
        }
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub products: Vec<SearchItem>,
    pub pagination: Pagination,
}

/// Body as sent by the server. Some deployments nest pagination, others
/// return `total`/`hasMore` at the top level.
#[derive(Debug, Deserialize)]
pub(crate) struct WireSearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    products: Vec<SearchItem>,
    #[serde(default)]
    pagination: Option<Pagination>,
    #[serde(default)]
    total: Option<u64>,
    #[serde(default, rename = "hasMore")]
    has_more: Option<bool>,
}

impl WireSearchResponse {
    pub(crate) fn into_response(self, query: &SearchQuery) -> SearchResponse {
        let pagination = match self.pagination {
            Some(pagination) => pagination,
            None => {
                let total = self.total.unwrap_or(self.products.len() as u64);
                let end = u64::from(query.offset) + u64::from(query.limit);
                Pagination {
                    total,
                    limit: query.limit,
                    offset: query.offset,
                    has_more: self.has_more.unwrap_or(total > end),
                }
            }
        };

        SearchResponse {
            products: self.products,
            pagination,
        }
    }
}
