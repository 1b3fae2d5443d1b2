use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;
use vitrina_search::check_status;

use crate::error::{CartError, Result};
use crate::types::{AddedProduct, AddedToCart, CartItem, CartSummary};

/// Cart operations for one (optionally signed-in) user.
///
/// Without a user, [`fetch`](Self::fetch) yields `None` and every mutation
/// fails with [`CartError::NotAuthenticated`] before any request is sent.
#[derive(Debug, Clone)]
pub struct CartClient {
    base_url: String,
    http_client: Client,
    user_id: Option<i64>,
    timeout: Option<Duration>,
}

#[derive(Deserialize)]
struct CartBody {
    cart: CartSummary,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    cart_item: Option<CartItem>,
    product: AddedProduct,
}

#[derive(Deserialize)]
struct MessageBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddRequest {
    user_id: i64,
    product_id: i64,
    quantity: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRequest {
    cart_item_id: i64,
    quantity: u32,
    user_id: i64,
}

impl CartClient {
    pub fn new(base_url: &str, http_client: Client, user_id: Option<i64>) -> Self {
        Self {
            base_url: base_url.to_string(),
            http_client,
            user_id,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    fn require_user(&self) -> Result<i64> {
        self.user_id.ok_or(CartError::NotAuthenticated)
    }

    fn endpoint(&self, segments: &[&str], pairs: &[(&str, String)]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| CartError::UrlParseError(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push("api")
            .push("cart")
            .extend(segments);
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    async fn send<T, B>(&self, method: Method, url: Url, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        debug!(%method, %url, "cart request");
        let mut request = self.http_client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = check_status(request.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    async fn fetch_for(&self, user_id: i64) -> Result<CartSummary> {
        let url = self.endpoint(&[], &[("userId", user_id.to_string())])?;
        let body: CartBody = self.send(Method::GET, url, None::<&()>).await?;
        Ok(body.cart)
    }

    /// The user's cart, or `None` when nobody is signed in.
    #[instrument(skip(self), fields(user_id = ?self.user_id))]
    pub async fn fetch(&self) -> Result<Option<CartSummary>> {
        match self.user_id {
            Some(user_id) => self.fetch_for(user_id).await.map(Some),
            None => Ok(None),
        }
    }

    #[instrument(skip(self), fields(user_id = ?self.user_id))]
    pub async fn add(&self, product_id: i64, quantity: u32) -> Result<AddedToCart> {
        let user_id = self.require_user()?;
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }

        let url = self.endpoint(&["add"], &[])?;
        let request = AddRequest {
            user_id,
            product_id,
            quantity,
        };
        let body: AddBody = self.send(Method::POST, url, Some(&request)).await?;
        info!(
            product = %body.product.name,
            cart_item = ?body.cart_item.as_ref().map(|item| item.id),
            message = body.message.as_deref().unwrap_or_default(),
            "added to cart"
        );

        let cart = self.fetch_for(user_id).await?;
        Ok(AddedToCart {
            product: body.product,
            cart,
        })
    }

    #[instrument(skip(self), fields(user_id = ?self.user_id))]
    pub async fn update_quantity(&self, cart_item_id: i64, quantity: u32) -> Result<CartSummary> {
        let user_id = self.require_user()?;
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }

        let url = self.endpoint(&["update"], &[])?;
        let request = UpdateRequest {
            cart_item_id,
            quantity,
            user_id,
        };
        let _: MessageBody = self.send(Method::PUT, url, Some(&request)).await?;
        self.fetch_for(user_id).await
    }

    #[instrument(skip(self), fields(user_id = ?self.user_id))]
    pub async fn remove(&self, cart_item_id: i64) -> Result<CartSummary> {
        let user_id = self.require_user()?;
        let url = self.endpoint(
            &["remove"],
            &[
                ("cartItemId", cart_item_id.to_string()),
                ("userId", user_id.to_string()),
            ],
        )?;
        let _: MessageBody = self.send(Method::DELETE, url, None::<&()>).await?;
        self.fetch_for(user_id).await
    }

    /// Remove every line from the user's cart.
    #[instrument(skip(self), fields(user_id = ?self.user_id))]
    pub async fn clear(&self) -> Result<()> {
        let user_id = self.require_user()?;
        let url = self.endpoint(&[], &[("userId", user_id.to_string())])?;
        let body: MessageBody = self.send(Method::DELETE, url, None::<&()>).await?;
        debug!(message = body.message.as_deref().unwrap_or_default(), "cart cleared");
        Ok(())
    }
}
