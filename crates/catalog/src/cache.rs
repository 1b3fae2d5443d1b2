use crate::types::{Brand, Category, CategoryOption, ProductDetail, Seller};

/// Values stored in the catalog cache
#[derive(Debug, Clone)]
pub(crate) enum CacheValue {
    Product(Box<ProductDetail>),
    Brand(Box<Brand>),
    Seller(Box<Seller>),
    Category(Box<Category>),
    Categories(Vec<Category>),
    CategoryOptions(Vec<CategoryOption>),
}

pub(crate) fn product_key(id: i64) -> String {
    format!("product:{id}")
}

pub(crate) fn brand_key(slug: &str) -> String {
    format!("brand:{slug}")
}

pub(crate) fn seller_key(id: i64) -> String {
    format!("seller:{id}")
}

pub(crate) fn category_key(slug: &str) -> String {
    format!("category:{slug}")
}

pub(crate) fn categories_key(include_product_count: bool) -> String {
    format!("categories:{include_product_count}")
}

pub(crate) const CATEGORY_OPTIONS_KEY: &str = "search-categories";
