use moka::future::Cache;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;
use vitrina_search::{check_status, null_as_default, HttpSearchBackend, SearchBackend, SearchItem};

use crate::cache::{self, CacheValue};
use crate::error::{CatalogError, Result};
use crate::query::{BrandQuery, ProductQuery};
use crate::types::{
    Brand, Category, CategoryOption, Product, ProductDetail, Seller, SellerProduct, SellerProfile,
    SellerStats,
};

/// Catalog client settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogOptions {
    /// Lifetime of cached details and category lists
    pub cache_ttl: Duration,
    pub cache_capacity: u64,
    pub request_timeout: Option<Duration>,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(300),
            cache_capacity: 1000,
            request_timeout: None,
        }
    }
}

impl CatalogOptions {
    pub fn with_cache_ttl(mut self, value: Duration) -> Self {
        self.cache_ttl = value;
        self
    }

    pub fn with_cache_capacity(mut self, value: u64) -> Self {
        self.cache_capacity = value;
        self
    }

    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }
}

/// Read-only access to products, brands, categories and sellers.
///
/// Product details, brands, categories and seller pages are cached; listings
/// are not.
/// Clones share the cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    base_url: String,
    http_client: Client,
    options: CatalogOptions,
    cache: Cache<String, CacheValue>,
    search: HttpSearchBackend,
}

#[derive(Deserialize)]
struct ProductsBody {
    #[serde(default)]
    products: Option<Vec<Product>>,
}

#[derive(Deserialize)]
struct BrandsBody {
    #[serde(default)]
    brands: Vec<Brand>,
}

#[derive(Deserialize)]
struct BrandBody {
    brand: Brand,
}

#[derive(Deserialize)]
struct CategoriesBody {
    #[serde(default)]
    categories: Vec<Category>,
}

#[derive(Deserialize)]
struct CategoryBody {
    category: Category,
}

#[derive(Deserialize)]
struct SellerBody {
    #[serde(default)]
    seller: Option<SellerProfile>,
    #[serde(default, deserialize_with = "null_as_default")]
    products: Vec<SellerProduct>,
    #[serde(default)]
    stats: Option<SellerStats>,
}

#[derive(Deserialize)]
struct CategoryOptionsBody {
    #[serde(default)]
    categories: Vec<CategoryOption>,
}

impl CatalogClient {
    pub fn new(base_url: &str, http_client: Client) -> Self {
        Self::new_with_options(base_url, http_client, CatalogOptions::default())
    }

    pub fn new_with_options(base_url: &str, http_client: Client, options: CatalogOptions) -> Self {
        let cache = Cache::builder()
            .max_capacity(options.cache_capacity)
            .time_to_live(options.cache_ttl)
            .build();
        let search = HttpSearchBackend::new(base_url, http_client.clone())
            .with_timeout(options.request_timeout);

        Self {
            inner: Arc::new(CatalogClientInner {
                base_url: base_url.to_string(),
                http_client,
                options,
                cache,
                search,
            }),
        }
    }

    pub fn options(&self) -> &CatalogOptions {
        &self.inner.options
    }

    fn endpoint(&self, segments: &[&str], pairs: Vec<(&'static str, String)>) -> Result<Url> {
        let mut url = Url::parse(&self.inner.base_url)?;
        url.path_segments_mut()
            .map_err(|_| CatalogError::UrlParseError(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!(%url, "catalog request");
        let mut request = self.inner.http_client.get(url);
        if let Some(timeout) = self.inner.options.request_timeout {
            request = request.timeout(timeout);
        }
        let response = check_status(request.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    /// List active products.
    #[instrument(skip(self))]
    pub async fn products(&self, query: &ProductQuery) -> Result<Vec<Product>> {
        let url = self.endpoint(&["products"], query.to_pairs())?;
        let body: ProductsBody = self.get_json(url).await?;
        match body.products {
            Some(products) => Ok(products),
            None => {
                warn!("product listing without a products array");
                Ok(Vec::new())
            }
        }
    }

    /// Product with its images and active variants.
    #[instrument(skip(self))]
    pub async fn product(&self, id: i64) -> Result<ProductDetail> {
        let key = cache::product_key(id);
        if let Some(CacheValue::Product(detail)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product");
            return Ok(*detail);
        }

        let id_segment = id.to_string();
        let url = self.endpoint(&["products", id_segment.as_str()], Vec::new())?;
        let detail: ProductDetail = self
            .get_json(url)
            .await
            .map_err(|e| e.or_not_found("product", id))?;

        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(detail.clone())))
            .await;
        Ok(detail)
    }

    /// Recommended products from the search endpoint.
    #[instrument(skip(self))]
    pub async fn recommended(&self, limit: u32) -> Result<Vec<SearchItem>> {
        Ok(self.inner.search.recommended(limit).await?)
    }

    #[instrument(skip(self))]
    pub async fn brands(&self, query: &BrandQuery) -> Result<Vec<Brand>> {
        let url = self.endpoint(&["brands"], query.to_pairs())?;
        let body: BrandsBody = self.get_json(url).await?;
        Ok(body.brands)
    }

    /// Active brand with its product count and sample products.
    #[instrument(skip(self))]
    pub async fn brand(&self, slug: &str) -> Result<Brand> {
        let key = cache::brand_key(slug);
        if let Some(CacheValue::Brand(brand)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for brand");
            return Ok(*brand);
        }

        let url = self.endpoint(&["brands", slug], Vec::new())?;
        let body: BrandBody = self
            .get_json(url)
            .await
            .map_err(|e| e.or_not_found("brand", slug))?;

        self.inner
            .cache
            .insert(key, CacheValue::Brand(Box::new(body.brand.clone())))
            .await;
        Ok(body.brand)
    }

    #[instrument(skip(self))]
    pub async fn categories(&self, include_product_count: bool) -> Result<Vec<Category>> {
        let key = cache::categories_key(include_product_count);
        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let pairs = if include_product_count {
            vec![("includeProductCount", "true".to_string())]
        } else {
            Vec::new()
        };
        let url = self.endpoint(&["categories"], pairs)?;
        let body: CategoriesBody = self.get_json(url).await?;

        self.inner
            .cache
            .insert(key, CacheValue::Categories(body.categories.clone()))
            .await;
        Ok(body.categories)
    }

    #[instrument(skip(self))]
    pub async fn category(&self, slug: &str) -> Result<Category> {
        let key = cache::category_key(slug);
        if let Some(CacheValue::Category(category)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for category");
            return Ok(*category);
        }

        let url = self.endpoint(&["categories", slug], Vec::new())?;
        let body: CategoryBody = self
            .get_json(url)
            .await
            .map_err(|e| e.or_not_found("category", slug))?;

        self.inner
            .cache
            .insert(key, CacheValue::Category(Box::new(body.category.clone())))
            .await;
        Ok(body.category)
    }

    /// Distinct product categories for the search filter.
    #[instrument(skip(self))]
    pub async fn search_categories(&self) -> Result<Vec<CategoryOption>> {
        if let Some(CacheValue::CategoryOptions(options)) =
            self.inner.cache.get(cache::CATEGORY_OPTIONS_KEY).await
        {
            debug!("Cache hit for search categories");
            return Ok(options);
        }

        let url = self.endpoint(&["search", "categories"], Vec::new())?;
        let body: CategoryOptionsBody = self.get_json(url).await?;

        self.inner
            .cache
            .insert(
                cache::CATEGORY_OPTIONS_KEY.to_string(),
                CacheValue::CategoryOptions(body.categories.clone()),
            )
            .await;
        Ok(body.categories)
    }

    /// Seller profile with its active products and stats.
    #[instrument(skip(self))]
    pub async fn seller(&self, id: i64) -> Result<Seller> {
        let key = cache::seller_key(id);
        if let Some(CacheValue::Seller(seller)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for seller");
            return Ok(*seller);
        }

        let id_segment = id.to_string();
        let url = self.endpoint(&["sellers", id_segment.as_str()], Vec::new())?;
        let body: SellerBody = self
            .get_json(url)
            .await
            .map_err(|e| e.or_not_found("seller", id))?;
        let Some(profile) = body.seller else {
            return Err(CatalogError::UnexpectedResponse(format!(
                "seller {id} response has no seller record"
            )));
        };

        let seller = Seller {
            profile,
            products: body.products,
            stats: body.stats,
        };
        self.inner
            .cache
            .insert(key, CacheValue::Seller(Box::new(seller.clone())))
            .await;
        Ok(seller)
    }

    pub async fn invalidate_product(&self, id: i64) {
        self.inner.cache.invalidate(&cache::product_key(id)).await;
    }

    /// Drop every cached entry.
    pub fn invalidate_cache(&self) {
        self.inner.cache.invalidate_all();
    }
}
