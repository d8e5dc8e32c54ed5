//! Checkout
//!
//! Validates the shipping address, places the order for the current server
//! cart and refreshes the cart afterwards (the backend empties it).

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use shared::models::{Order, OrderCreate, PaymentMethod, ShippingAddress};

use crate::api;
use crate::cart::CartStore;
use crate::crud::SubmitGuard;
use crate::error::{ClientError, ClientResult};
use crate::http::{HttpClient, NetworkHttpClient};
use crate::navigation::ORDERS_PATH;
use crate::notify::Notifier;
use crate::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};

/// Shipping address as typed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShippingForm {
    pub full_name: String,
    pub phone: String,
    pub address_line: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl ShippingForm {
    pub fn validate(&self) -> ClientResult<ShippingAddress> {
        let phone = validate_required_text(&self.phone, "Phone", MAX_SHORT_TEXT_LEN)?;
        if phone.chars().filter(char::is_ascii_digit).count() < 10 {
            return Err(ClientError::InvalidInput(
                "Please enter a valid phone number".into(),
            ));
        }
        Ok(ShippingAddress {
            full_name: validate_required_text(&self.full_name, "Full name", MAX_NAME_LEN)?,
            phone,
            address_line: validate_required_text(&self.address_line, "Address", MAX_NOTE_LEN)?,
            city: validate_required_text(&self.city, "City", MAX_NAME_LEN)?,
            state: validate_required_text(&self.state, "State", MAX_NAME_LEN)?,
            postal_code: validate_required_text(
                &self.postal_code,
                "Postal code",
                MAX_SHORT_TEXT_LEN,
            )?,
        })
    }
}

pub struct Checkout<C: HttpClient = NetworkHttpClient> {
    client: Arc<C>,
    cart: Arc<CartStore<C>>,
    notifier: Arc<dyn Notifier>,
    submitting: AtomicBool,
}

impl<C: HttpClient> Checkout<C> {
    pub fn new(client: Arc<C>, cart: Arc<CartStore<C>>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            cart,
            notifier,
            submitting: AtomicBool::new(false),
        }
    }

    /// `POST /orders`, refresh the cart, show the order history
    pub async fn place_order(
        &self,
        form: &ShippingForm,
        payment_method: PaymentMethod,
        notes: &str,
    ) -> ClientResult<Order> {
        let _guard = SubmitGuard::acquire(&self.submitting)?;
        let shipping_address = form.validate()?;
        if self.cart.snapshot().is_empty() {
            return Err(ClientError::InvalidInput("Your cart is empty".into()));
        }
        let body = OrderCreate {
            shipping_address,
            payment_method,
            notes: validate_optional_text(notes, "Notes", MAX_NOTE_LEN)?,
        };

        let order = match api::orders::place(&*self.client, &body).await {
            Ok(order) => order,
            Err(e) => {
                tracing::warn!(error = %e, "Order placement failed");
                if !e.is_unauthorized() {
                    self.notifier.error(&e.user_message("Failed to place order"));
                }
                return Err(e);
            }
        };

        tracing::info!(order_id = %order.id, total = order.total_amount, "Order placed");
        if let Err(e) = self.cart.refresh().await {
            tracing::warn!(error = %e, "Cart refresh after checkout failed");
        }
        self.notifier.success("Order placed successfully");
        self.client.navigator().push(ORDERS_PATH);
        Ok(order)
    }
}
