#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use serde_json::json;
    use vitrina_catalog::{
        BrandQuery, CatalogClient, CatalogError, ProductQuery, ProductSort, SortOrder,
        VariantSelector,
    };
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn setup_client(server: &MockServer) -> CatalogClient {
        CatalogClient::new(&server.uri(), reqwest::Client::new())
    }

    #[tokio::test]
    async fn lists_products_with_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .and(query_param("category", "Relojes"))
            .and(query_param("sortBy", "price"))
            .and(query_param("sortOrder", "desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "products": [{
                    "id": 1,
                    "name": "Reloj Orient",
                    "price": "125000.00",
                    "category": "Relojes",
                    "brands": { "id": 2, "name": "Orient", "slug": "orient" },
                    "primary_image": "https://cdn.example.com/1.jpg"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_client(&server);
        let products = client
            .products(
                &ProductQuery::new()
                    .with_category("Relojes")
                    .with_sort(ProductSort::Price, SortOrder::Desc),
            )
            .await
            .unwrap();

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].price, Decimal::new(125000, 0));
        assert_eq!(products[0].brands.as_ref().map(|b| b.name.as_str()), Some("Orient"));
    }

    #[tokio::test]
    async fn missing_products_array_is_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let products = setup_client(&server)
            .products(&ProductQuery::default())
            .await
            .unwrap();
        assert!(products.is_empty());
    }

    #[tokio::test]
    async fn product_detail_is_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "product": {
                    "id": 7,
                    "name": "Camiseta",
                    "price": "10000.00",
                    "currency": "CRC",
                    "has_variants": true,
                    "images": [{ "id": 1, "file_url": "https://cdn.example.com/base.jpg", "display_order": 0 }]
                },
                "variants": [
                    { "id": 10, "sku": "CAM-R-M", "price": "11000.00", "stock_quantity": 2, "is_active": true,
                      "attributes": { "color": "Rojo", "talla": "M" }, "images": [] },
                    { "id": 11, "sku": "CAM-A-M", "price": "11000.00", "stock_quantity": 0, "is_active": true,
                      "attributes": { "color": "Azul", "talla": "M" }, "images": [] }
                ],
                "reviews": [],
                "stats": { "avgRating": 4.5, "reviewCount": 24 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_client(&server);
        let first = client.product(7).await.unwrap();
        let second = client.clone().product(7).await.unwrap();
        assert_eq!(first, second);

        let mut selector = VariantSelector::new(first);
        assert_eq!(selector.line_id(), "7-10");
        selector.select_attribute("color", "Azul");
        assert_eq!(selector.line_id(), "7-11");
        assert_eq!(selector.stock(), 0);
        assert_eq!(selector.images()[0].file_url, "https://cdn.example.com/base.jpg");
    }

    #[tokio::test]
    async fn invalidation_forces_refetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/categories"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "categories": [{ "id": 1, "name": "Relojes", "slug": "relojes" }]
            })))
            .expect(2)
            .mount(&server)
            .await;

        let client = setup_client(&server);
        client.categories(false).await.unwrap();
        client.categories(false).await.unwrap();
        client.invalidate_cache();
        let categories = client.categories(false).await.unwrap();
        assert_eq!(categories[0].slug, "relojes");
    }

    #[tokio::test]
    async fn unknown_product_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products/999"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({ "error": "Producto no encontrado" })),
            )
            .mount(&server)
            .await;

        let err = setup_client(&server).product(999).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(
            err,
            CatalogError::NotFound { resource: "product", ref id } if id == "999"
        ));
    }

    #[tokio::test]
    async fn brand_lookup_and_listing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/brands"))
            .and(query_param("includeProductCount", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "brands": [{ "id": 2, "name": "Orient", "slug": "orient", "product_count": 3 }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/brands/orient"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "brand": {
                    "id": 2, "name": "Orient", "slug": "orient", "is_active": true,
                    "product_count": 3,
                    "sample_products": [{ "id": 1, "name": "Reloj Orient", "price": "125000.00" }]
                }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/brands/nadie"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "Marca no encontrada" })))
            .mount(&server)
            .await;

        let client = setup_client(&server);
        let brands = client.brands(&BrandQuery::new().with_product_count()).await.unwrap();
        assert_eq!(brands[0].product_count, Some(3));

        let brand = client.brand("orient").await.unwrap();
        assert_eq!(brand.sample_products.len(), 1);

        let err = client.brand("nadie").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn search_categories_and_recommended() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/search/categories"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "categories": [
                    { "id": "joyas", "label": "Joyas", "value": "Joyas" },
                    { "id": "ropa-de-mujer", "label": "Ropa de mujer", "value": "Ropa de mujer" }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/search"))
            .and(query_param("recommended", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "products": [{ "id": 5, "name": "Anillo", "price": 30000 }],
                "total": 1,
                "hasMore": false
            })))
            .mount(&server)
            .await;

        let client = setup_client(&server);
        let options = client.search_categories().await.unwrap();
        assert_eq!(options[1].id, "ropa-de-mujer");
        client.search_categories().await.unwrap();

        let recommended = client.recommended(4).await.unwrap();
        assert_eq!(recommended[0].name, "Anillo");
    }

    #[tokio::test]
    async fn rate_limit_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/brands"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "5"))
            .mount(&server)
            .await;

        let err = setup_client(&server)
            .brands(&BrandQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::RateLimited { retry_after: Some(_) }));
    }

    #[tokio::test]
    async fn seller_page_is_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/sellers/4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "seller": {
                    "user_id": 4,
                    "seller_type": "emprendedor",
                    "landing_description": "Joyería artesanal",
                    "fe_active": true,
                    "users": { "id": 4, "name": "Ana Mora", "email": "ana@example.com", "role": "seller" }
                },
                "products": [
                    { "id": 21, "name": "Aretes de plata", "price": "18000.00", "is_active": true },
                    { "id": 20, "name": "Collar", "price": 25000, "is_active": true }
                ],
                "stats": { "rating": 4.8, "reviewCount": 124, "positiveResponseRate": 98, "totalSales": 30 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = setup_client(&server);
        let seller = client.seller(4).await.unwrap();
        assert_eq!(seller.profile.display_name(), "Ana Mora");
        assert!(seller.profile.fe_active);
        assert_eq!(seller.products.len(), 2);
        assert_eq!(seller.products[0].price, Decimal::new(1800000, 2));
        assert_eq!(seller.stats.map(|s| s.total_sales), Some(30));

        let again = client.seller(4).await.unwrap();
        assert_eq!(again, seller);
    }

    #[tokio::test]
    async fn seller_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/sellers/9"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({ "error": "Vendedor no encontrado" })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/sellers/5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "products": [] })))
            .mount(&server)
            .await;

        let client = setup_client(&server);
        let err = client.seller(9).await.unwrap_err();
        assert!(matches!(
            err,
            CatalogError::NotFound { resource: "seller", ref id } if id == "9"
        ));

        let err = client.seller(5).await.unwrap_err();
        assert!(matches!(err, CatalogError::UnexpectedResponse(_)));
    }
}
