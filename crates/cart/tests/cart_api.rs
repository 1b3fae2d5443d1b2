#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use serde_json::{json, Value};
    use vitrina_cart::{CartClient, CartError};
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn cart_body(quantity: u32) -> Value {
        json!({
            "cart": {
                "items": [{
                    "id": 41,
                    "user_id": 3,
                    "product_id": 7,
                    "quantity": quantity,
                    "added_at": "2024-05-01T10:00:00Z",
                    "products": {
                        "id": 7,
                        "name": "Camiseta",
                        "price": "10000.00",
                        "is_active": true,
                        "stock_quantity": 9,
                        "brands": { "name": "Sol", "slug": "sol" }
                    }
                }],
                "totalItems": quantity,
                "subtotal": 10000 * quantity,
                "itemCount": 1
            }
        })
    }

    async fn mount_cart(server: &MockServer, quantity: u32) {
        Mock::given(method("GET"))
            .and(path("/api/cart"))
            .and(query_param("userId", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(cart_body(quantity)))
            .mount(server)
            .await;
    }

    fn signed_in(server: &MockServer) -> CartClient {
        CartClient::new(&server.uri(), reqwest::Client::new(), Some(3))
    }

    #[tokio::test]
    async fn fetches_cart_summary() {
        let server = MockServer::start().await;
        mount_cart(&server, 2).await;

        let cart = signed_in(&server).fetch().await.unwrap().unwrap();
        assert_eq!(cart.item_count, 1);
        assert_eq!(cart.total_items, 2);
        assert_eq!(cart.subtotal, Decimal::from(20000));
        assert_eq!(
            cart.items[0].products.as_ref().and_then(|p| p.brands.as_ref()).map(|b| b.slug.as_str()),
            Some("sol")
        );
    }

    #[tokio::test]
    async fn anonymous_client_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = CartClient::new(&server.uri(), reqwest::Client::new(), None);
        assert_eq!(client.fetch().await.unwrap(), None);
        assert!(matches!(client.add(7, 1).await, Err(CartError::NotAuthenticated)));
        assert!(matches!(client.remove(41).await, Err(CartError::NotAuthenticated)));
        assert!(matches!(client.clear().await, Err(CartError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn add_posts_and_refreshes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/cart/add"))
            .and(body_json(json!({ "userId": 3, "productId": 7, "quantity": 1 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Producto agregado al carrito exitosamente",
                "cartItem": { "id": 41, "product_id": 7, "quantity": 1 },
                "product": { "id": 7, "name": "Camiseta", "price": "10000.00" }
            })))
            .expect(1)
            .mount(&server)
            .await;
        mount_cart(&server, 1).await;

        let added = signed_in(&server).add(7, 1).await.unwrap();
        assert_eq!(added.product.name, "Camiseta");
        assert_eq!(added.cart.total_items, 1);
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected_locally() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = signed_in(&server);
        assert!(matches!(
            client.update_quantity(41, 0).await,
            Err(CartError::InvalidQuantity(0))
        ));
        assert!(matches!(client.add(7, 0).await, Err(CartError::InvalidQuantity(0))));
    }

    #[tokio::test]
    async fn update_quantity_reports_stock_error() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/cart/update"))
            .and(body_json(json!({ "cartItemId": 41, "quantity": 20, "userId": 3 })))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "Stock insuficiente. Solo hay 9 unidades disponibles"
            })))
            .mount(&server)
            .await;

        let err = signed_in(&server).update_quantity(41, 20).await.unwrap_err();
        match err {
            CartError::ApiError { status, message } => {
                assert_eq!(status, 400);
                assert!(message.starts_with("Stock insuficiente"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn remove_and_clear() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/cart/remove"))
            .and(query_param("cartItemId", "41"))
            .and(query_param("userId", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Producto eliminado del carrito exitosamente"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/cart"))
            .and(query_param("userId", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Carrito limpiado exitosamente"
            })))
            .expect(1)
            .mount(&server)
            .await;
        mount_cart(&server, 2).await;

        let client = signed_in(&server);
        client.remove(41).await.unwrap();
        client.clear().await.unwrap();
    }

    #[tokio::test]
    async fn missing_item_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/cart/remove"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": "Item del carrito no encontrado"
            })))
            .mount(&server)
            .await;

        let err = signed_in(&server).remove(99).await.unwrap_err();
        assert!(matches!(err, CartError::NotFound(ref m) if m == "Item del carrito no encontrado"));
    }

    #[tokio::test]
    async fn rate_limit_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/cart"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": "Too many requests. Please try again later."
            })))
            .mount(&server)
            .await;

        let err = signed_in(&server).fetch().await.unwrap_err();
        assert!(matches!(err, CartError::RateLimited { retry_after: None }));
    }
}
