//! Cart state holder
//!
//! Mirrors the server cart. Every mutation is one round trip whose answer
//! replaces the whole local snapshot; totals are always computed over the
//! last snapshot received.

use std::sync::Arc;

use shared::models::Cart;
use tokio::sync::watch;

use crate::api;
use crate::auth::AuthSession;
use crate::error::{ClientError, ClientResult};
use crate::http::{HttpClient, NetworkHttpClient};
use crate::notify::Notifier;

pub const LOGIN_REQUIRED: &str = "Please log in to add items to cart";
pub const ADDED: &str = "Added to cart";
pub const REMOVED: &str = "Item removed";
pub const CLEARED: &str = "Cart cleared";

pub struct CartStore<C: HttpClient = NetworkHttpClient> {
    client: Arc<C>,
    auth: Arc<AuthSession<C>>,
    notifier: Arc<dyn Notifier>,
    cart: watch::Sender<Cart>,
}

impl<C: HttpClient> CartStore<C> {
    pub fn new(client: Arc<C>, auth: Arc<AuthSession<C>>, notifier: Arc<dyn Notifier>) -> Self {
        let (cart, _) = watch::channel(Cart::default());
        Self {
            client,
            auth,
            notifier,
            cart,
        }
    }

    /// Last server snapshot
    pub fn snapshot(&self) -> Cart {
        self.cart.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.cart.subscribe()
    }

    /// Σ quantity
    pub fn total_items(&self) -> u32 {
        self.cart.borrow().total_items()
    }

    /// Σ price × quantity
    pub fn total_price(&self) -> f64 {
        self.cart.borrow().total_price()
    }

    /// `GET /cart`; an anonymous user simply has an empty cart.
    pub async fn refresh(&self) -> ClientResult<()> {
        if !self.auth.is_authenticated() {
            self.replace(Cart::default());
            return Ok(());
        }
        match api::cart::get(&*self.client).await {
            Ok(cart) => {
                self.replace(cart);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch cart");
                Err(e)
            }
        }
    }

    pub async fn add(&self, product_id: &str, quantity: u32) -> ClientResult<()> {
        self.require_login()?;
        let result = api::cart::add(&*self.client, product_id, quantity).await;
        self.apply(result, Some(ADDED), "Failed to add to cart")
    }

    /// Set an item's quantity. Anything below 1 is ignored without a request.
    pub async fn update_quantity(&self, item_id: &str, quantity: i64) -> ClientResult<()> {
        self.require_login()?;
        let Ok(quantity) = u32::try_from(quantity) else {
            return Ok(());
        };
        if quantity < 1 {
            return Ok(());
        }
        let result = api::cart::update(&*self.client, item_id, quantity).await;
        self.apply(result, None, "Failed to update cart")
    }

    pub async fn remove(&self, item_id: &str) -> ClientResult<()> {
        self.require_login()?;
        let result = api::cart::remove(&*self.client, item_id).await;
        self.apply(result, Some(REMOVED), "Failed to remove item")
    }

    pub async fn clear(&self) -> ClientResult<()> {
        self.require_login()?;
        let result = api::cart::clear(&*self.client).await;
        self.apply(result, Some(CLEARED), "Failed to clear cart")
    }

    fn require_login(&self) -> ClientResult<()> {
        if self.auth.is_authenticated() {
            return Ok(());
        }
        self.notifier.error(LOGIN_REQUIRED);
        Err(ClientError::NotLoggedIn)
    }

    fn apply(
        &self,
        result: ClientResult<Cart>,
        success: Option<&str>,
        fallback: &str,
    ) -> ClientResult<()> {
        match result {
            Ok(cart) => {
                self.replace(cart);
                if let Some(message) = success {
                    self.notifier.success(message);
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cart update failed");
                if !e.is_unauthorized() {
                    self.notifier.error(&e.user_message(fallback));
                }
                Err(e)
            }
        }
    }

    fn replace(&self, cart: Cart) {
        tracing::debug!(
            items = cart.items.len(),
            total_items = cart.total_items(),
            "Cart snapshot replaced"
        );
        self.cart.send_replace(cart);
    }
}

impl<C: HttpClient> std::fmt::Debug for CartStore<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &*self.cart.borrow())
            .finish_non_exhaustive()
    }
}
