//! Catalog client for the Vitrina storefront API
//!
//! Products, product details with variants, brands, categories and seller
//! profiles. Detail lookups are cached with `moka`; [`VariantSelector`]
//! drives variant choice on a product page.

mod cache;
mod client;
mod error;
mod query;
mod types;
mod variants;

pub use client::{CatalogClient, CatalogOptions};
pub use error::{CatalogError, Result};
pub use query::{BrandQuery, ProductQuery, ProductSort, SortOrder};
pub use types::{
    Brand, Category, CategoryOption, Product, ProductDetail, ProductMedia, ProductStats,
    ProductVariant, SampleProduct, Seller, SellerAccount, SellerProduct, SellerProfile,
    SellerStats,
};
pub use variants::VariantSelector;
