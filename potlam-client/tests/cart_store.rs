// potlam-client/tests/cart_store.rs
// Server-side cart through the cart holder

mod common;

use std::sync::Arc;

use common::{CUSTOMER_EMAIL, PASSWORD, TestApp};
use potlam_client::notify::NoticeLevel;
use potlam_client::{CartStore, ClientError};

fn store(app: &TestApp) -> CartStore {
    CartStore::new(app.client.clone(), app.auth.clone(), app.notices.clone())
}

#[tokio::test]
async fn test_anonymous_add_asks_to_log_in() {
    let app = TestApp::start_at("/products").await;
    let cart = store(&app);

    let err = cart.add("p-avakaya", 1).await.unwrap_err();

    assert!(matches!(err, ClientError::NotLoggedIn));
    assert_eq!(
        app.notices.messages(NoticeLevel::Error),
        vec!["Please log in to add items to cart".to_string()]
    );
    assert_eq!(app.state().count_prefix("/cart"), 0);
}

#[tokio::test]
async fn test_anonymous_refresh_is_empty_without_request() {
    let app = TestApp::start_at("/").await;
    let cart = store(&app);

    cart.refresh().await.unwrap();

    assert_eq!(cart.total_items(), 0);
    assert_eq!(app.state().count("GET", "/cart"), 0);
}

#[tokio::test]
async fn test_add_and_totals() {
    let app = TestApp::start_at("/products").await;
    app.login_at(CUSTOMER_EMAIL, PASSWORD, "/products").await;
    let cart = Arc::new(store(&app));
    let mut changes = cart.subscribe();

    cart.add("p-avakaya", 2).await.unwrap();
    cart.add("p-gongura", 1).await.unwrap();

    assert!(changes.has_changed().unwrap());
    assert_eq!(cart.total_items(), 3);
    assert_eq!(cart.total_price(), 698.99);
    assert_eq!(
        app.notices.messages(NoticeLevel::Success),
        vec!["Added to cart".to_string(), "Added to cart".to_string()]
    );
}

#[tokio::test]
async fn test_quantity_below_one_sends_nothing() {
    let app = TestApp::start_at("/cart").await;
    app.login_at(CUSTOMER_EMAIL, PASSWORD, "/cart").await;
    let cart = store(&app);
    cart.add("p-avakaya", 1).await.unwrap();
    let item_id = cart.snapshot().items[0].id.clone();

    cart.update_quantity(&item_id, 0).await.unwrap();
    cart.update_quantity(&item_id, -3).await.unwrap();

    assert_eq!(app.state().count("PUT", &format!("/cart/{item_id}")), 0);
    assert_eq!(cart.total_items(), 1);

    cart.update_quantity(&item_id, 4).await.unwrap();
    assert_eq!(app.state().count("PUT", &format!("/cart/{item_id}")), 1);
    assert_eq!(cart.total_items(), 4);
}

#[tokio::test]
async fn test_remove_and_clear() {
    let app = TestApp::start_at("/cart").await;
    app.login_at(CUSTOMER_EMAIL, PASSWORD, "/cart").await;
    let cart = store(&app);
    cart.add("p-avakaya", 1).await.unwrap();
    cart.add("p-gongura", 2).await.unwrap();

    let first = cart.snapshot().items[0].id.clone();
    cart.remove(&first).await.unwrap();
    assert_eq!(cart.total_items(), 2);

    cart.clear().await.unwrap();
    assert!(cart.snapshot().is_empty());
    let successes = app.notices.messages(NoticeLevel::Success);
    assert_eq!(
        successes[2..],
        ["Item removed".to_string(), "Cart cleared".to_string()]
    );
}

#[tokio::test]
async fn test_out_of_stock_shows_server_message() {
    let app = TestApp::start_at("/products").await;
    app.login_at(CUSTOMER_EMAIL, PASSWORD, "/products").await;
    let cart = store(&app);

    let err = cart.add("p-gongura", 50).await.unwrap_err();

    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(
        app.notices.last().map(|n| n.message),
        Some("Insufficient stock".to_string())
    );
    assert!(cart.snapshot().is_empty());
}
