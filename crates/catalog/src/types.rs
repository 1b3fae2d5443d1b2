//! Catalog records as returned by the storefront API

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vitrina_search::{null_as_default, BrandRef, SellerSummary};

/// Image or file attached to a product or one of its variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMedia {
    pub id: i64,
    pub file_url: String,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default, alias = "media_type")]
    pub file_type: Option<String>,
    #[serde(default)]
    pub display_order: Option<i32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_primary: bool,
    #[serde(default)]
    pub variant_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub seller_id: Option<i64>,
    #[serde(default)]
    pub brand_id: Option<i64>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub is_promoted: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_variants: bool,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub sellers: Option<SellerSummary>,
    #[serde(default)]
    pub brands: Option<BrandRef>,
    /// First image for listings, preferring product-level media
    #[serde(default)]
    pub primary_image: Option<String>,
    /// Product-level images; only filled on the detail endpoint
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<ProductMedia>,
}

impl Product {
    /// The image flagged as primary, else the first by display order.
    pub fn primary_media(&self) -> Option<&ProductMedia> {
        self.images.iter().find(|m| m.is_primary).or_else(|| {
            self.images
                .iter()
                .min_by_key(|m| m.display_order.unwrap_or(i32::MAX))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: i64,
    #[serde(default)]
    pub sku: Option<String>,
    pub price: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stock_quantity: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// e.g. `{"color": "Rojo", "talla": "M"}`; empty for plain variants
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<ProductMedia>,
}

fn default_true() -> bool {
    true
}

impl ProductVariant {
    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStats {
    #[serde(default)]
    pub avg_rating: f64,
    #[serde(default)]
    pub review_count: u64,
}

/// `GET /api/products/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub product: Product,
    #[serde(default, deserialize_with = "null_as_default")]
    pub variants: Vec<ProductVariant>,
    #[serde(default)]
    pub stats: Option<ProductStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleProduct {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brand {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub product_count: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sample_products: Vec<SampleProduct>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub product_count: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Entry of the search page's category filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryOption {
    pub id: String,
    pub label: String,
    pub value: String,
}

/// User account behind a seller profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerAccount {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerProfile {
    pub user_id: i64,
    #[serde(default)]
    pub seller_type: Option<String>,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
    #[serde(default)]
    pub landing_description: Option<String>,
    #[serde(default)]
    pub social_links: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fe_active: bool,
    #[serde(default)]
    pub users: Option<SellerAccount>,
}

impl SellerProfile {
    pub fn display_name(&self) -> &str {
        self.users.as_ref().map(|u| u.name.as_str()).unwrap_or_default()
    }
}

/// Active product on a seller's page, newest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerProduct {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub is_promoted: Option<bool>,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerStats {
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u64,
    #[serde(default)]
    pub positive_response_rate: f64,
    #[serde(default)]
    pub total_sales: u64,
}

/// `GET /api/sellers/{id}`: profile, listed products and stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seller {
    pub profile: SellerProfile,
    pub products: Vec<SellerProduct>,
    pub stats: Option<SellerStats>,
}
