//! Shopping cart client for the Vitrina storefront API
//!
//! Every mutation is followed by a fresh read of the cart so callers always
//! hold the server's view of totals and stock.

mod client;
mod error;
mod types;

pub use client::CartClient;
pub use error::{CartError, Result};
pub use types::{AddedProduct, AddedToCart, CartBrand, CartItem, CartProduct, CartSummary};
