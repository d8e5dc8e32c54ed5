//! In-process mock of the Potlam REST backend
//!
//! Serves the subset of the API the client drives, on `127.0.0.1:0`.
//! Sessions are an HttpOnly `token` cookie holding the user id, plus a
//! client-readable `user_role` cookie. Every request is recorded so tests
//! can assert what was (or was not) sent.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use axum::body::Body;
use axum::extract::{Multipart, Path, Query, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{AppendHeaders, IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use potlam_client::{
    AuthSession, ClientConfig, MemoryNavigator, NetworkHttpClient, NoticeLog,
};
use serde_json::{Value, json};

pub const ADMIN_EMAIL: &str = "admin@potlam.in";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const EMPLOYEE_EMAIL: &str = "cook@potlam.in";
pub const CUSTOMER_EMAIL: &str = "shopper@potlam.in";
pub const PASSWORD: &str = "secret1";

/// Category id whose DELETE fails with an empty 500
pub const BROKEN_CATEGORY: &str = "c-broken";
/// Category id whose GET fails with a proxy's HTML 502 page
pub const GATEWAY_DOWN_CATEGORY: &str = "c-gateway";
/// Session type still used by sessions
pub const REFERENCED_SESSION_TYPE: &str = "st-morning";
/// Seeded cash session, already closed
pub const CLOSED_SESSION: &str = "cs-2024-05-01";
pub const IN_USE_MESSAGE: &str =
    "Cannot delete session type that is used by existing sessions. Mark it inactive instead.";

struct TestUser {
    id: &'static str,
    email: &'static str,
    password: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    role: &'static str,
}

static USERS: [TestUser; 3] = [
    TestUser {
        id: "u-admin",
        email: ADMIN_EMAIL,
        password: ADMIN_PASSWORD,
        first_name: "Ramesh",
        last_name: "Naidu",
        role: "admin",
    },
    TestUser {
        id: "u-cook",
        email: EMPLOYEE_EMAIL,
        password: PASSWORD,
        first_name: "Kamala",
        last_name: "Reddy",
        role: "employee",
    },
    TestUser {
        id: "u-shopper",
        email: CUSTOMER_EMAIL,
        password: PASSWORD,
        first_name: "Anil",
        last_name: "Varma",
        role: "user",
    },
];

impl TestUser {
    fn to_json(&self) -> Value {
        json!({
            "_id": self.id,
            "firstName": self.first_name,
            "lastName": self.last_name,
            "email": self.email,
            "role": self.role,
        })
    }

    fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// One request as the backend saw it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path without the `/api` prefix
    pub path: String,
    pub query: String,
    pub body: Value,
}

#[derive(Default)]
struct Data {
    requests: Vec<RecordedRequest>,
    next_id: u64,
    registered: Vec<String>,
    categories: Vec<Value>,
    products: Vec<Value>,
    session_types: Vec<Value>,
    sessions: Vec<Value>,
    cart: HashMap<String, Vec<Value>>,
    recipes: Vec<Value>,
    day_plans: Vec<Value>,
    orders: Vec<Value>,
    settings: Value,
    roles: HashMap<String, String>,
}

impl Data {
    fn id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}

#[derive(Default)]
pub struct MockState {
    data: Mutex<Data>,
}

type Shared = Arc<MockState>;

impl MockState {
    fn data(&self) -> std::sync::MutexGuard<'_, Data> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.data().requests.clone()
    }

    /// Requests matching method and exact path
    pub fn matching(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.data()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .cloned()
            .collect()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.matching(method, path).len()
    }

    /// Requests whose path starts with `prefix`
    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.data()
            .requests
            .iter()
            .filter(|r| r.path.starts_with(prefix))
            .count()
    }

    pub fn clear_requests(&self) {
        self.data().requests.clear();
    }

    fn seed(&self) {
        let mut data = self.data();
        data.categories = vec![
            json!({"_id": "c-pickles", "name": "Pickles", "slug": "pickles", "description": "Andhra style pickles", "isActive": true}),
            json!({"_id": "c-podis", "name": "Podis", "slug": "podis", "isActive": true}),
            json!({"_id": BROKEN_CATEGORY, "name": "Sweets", "slug": "sweets", "isActive": false}),
        ];
        data.products = vec![
            json!({"_id": "p-avakaya", "name": "Avakaya Mango Pickle", "description": "Raw mango, mustard, chilli", "price": 249.5, "category": {"_id": "c-pickles", "name": "Pickles"}, "stock": 40, "isActive": true}),
            json!({"_id": "p-gongura", "name": "Gongura Pickle", "description": "Sorrel leaves", "price": 199.99, "category": {"_id": "c-pickles", "name": "Pickles"}, "stock": 12, "isActive": true}),
            json!({"_id": "p-kandi", "name": "Kandi Podi", "description": "Roasted lentil powder", "price": 150.0, "category": "c-podis", "stock": 0, "isActive": false}),
        ];
        data.session_types = vec![
            json!({"_id": REFERENCED_SESSION_TYPE, "name": "Morning counter", "isActive": true}),
            json!({"_id": "st-evening", "name": "Evening counter", "isActive": true}),
        ];
        data.sessions = vec![json!({
            "_id": CLOSED_SESSION,
            "date": "2024-05-01T00:00:00.000Z",
            "sessionType": {"_id": REFERENCED_SESSION_TYPE, "name": "Morning counter"},
            "openingAmount": 1000.0,
            "closingAmount": 1850.75,
            "status": "closed",
        })];
        data.settings = json!({
            "storeName": "Andhra Potlam",
            "currency": "INR",
            "deliveryCharge": 40.0,
            "whatsappNumber": "+91 90000 00000",
        });
        data.recipes = vec![
            json!({"_id": "r-avakaya", "name": "Avakaya Pickle", "serves": 20, "isActive": true, "steps": [
                {"title": "Cut mangoes", "duration": 30, "location": "Prep table"},
                {"title": "Mix masala", "duration": 15},
            ]}),
            json!({"_id": "r-gongura", "name": "Gongura Pachadi", "serves": 10, "isActive": true, "steps": [
                {"title": "Saute leaves", "duration": 20},
            ]}),
            json!({"_id": "r-old", "name": "Retired recipe", "serves": 1, "isActive": false, "steps": []}),
        ];
    }
}

/// Running mock backend
pub struct MockBackend {
    pub base_url: String,
    pub state: Shared,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(MockState::default());
        state.seed();

        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/register", post(register))
            .route("/api/auth/logout", post(logout))
            .route("/api/users/me", get(me))
            .route("/api/categories", get(list_categories).post(create_category))
            .route(
                "/api/categories/{id}",
                get(get_category).put(update_category).delete(delete_category),
            )
            .route("/api/products", get(list_products))
            .route(
                "/api/cashbox/session-types",
                get(list_session_types).post(create_session_type),
            )
            .route(
                "/api/cashbox/session-types/{id}",
                put(update_session_type).delete(delete_session_type),
            )
            .route("/api/cashbox/sessions", get(list_sessions).post(open_session))
            .route("/api/cashbox/sessions/{id}/close", post(close_session))
            .route("/api/cart", get(get_cart).post(add_to_cart).delete(clear_cart))
            .route("/api/cart/{id}", put(update_cart_item).delete(remove_cart_item))
            .route("/api/recipes", get(list_recipes))
            .route("/api/day-plans", get(list_day_plans).post(create_day_plan))
            .route("/api/day-plans/{id}", get(get_day_plan).put(update_day_plan))
            .route("/api/day-plans/{id}/generate-tasks", post(generate_tasks))
            .route("/api/orders", get(all_orders).post(place_order))
            .route("/api/orders/my-orders", get(my_orders))
            .route("/api/orders/{id}/status", put(update_order_status))
            .route("/api/settings", get(get_settings).put(save_settings))
            .route("/api/users", get(list_users))
            .route("/api/users/{id}/role", put(set_role))
            .route("/api/upload/image", post(upload_image))
            .layer(middleware::from_fn_with_state(state.clone(), record))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}/api"),
            state,
        }
    }
}

/// Everything a screen test needs, wired the way an application root would
pub struct TestApp {
    pub backend: MockBackend,
    pub navigator: Arc<MemoryNavigator>,
    pub notices: Arc<NoticeLog>,
    pub client: Arc<NetworkHttpClient>,
    pub auth: Arc<AuthSession>,
}

impl TestApp {
    /// Start a backend and a client currently showing `path`
    pub async fn start_at(path: &str) -> Self {
        init_tracing();
        let backend = MockBackend::start().await;
        let navigator = Arc::new(MemoryNavigator::new(path));
        let client = Arc::new(
            NetworkHttpClient::new(&ClientConfig::new(&backend.base_url), navigator.clone())
                .unwrap(),
        );
        let auth = Arc::new(AuthSession::new(client.clone()));
        Self {
            backend,
            navigator,
            notices: Arc::new(NoticeLog::new()),
            client,
            auth,
        }
    }

    pub fn state(&self) -> &MockState {
        &self.backend.state
    }

    /// Log in, then put the router back on `path`
    pub async fn login_at(&self, email: &str, password: &str, path: &str) {
        self.navigator.set_current("/auth/login");
        self.auth.login(email, password).await.unwrap();
        self.navigator.set_current(path);
    }
}

/// Route client logs to the test output; `RUST_LOG` overrides the level
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "potlam_client=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

// ============================================================================
// Middleware and helpers
// ============================================================================

async fn record(State(state): State<Shared>, req: Request, next: Next) -> Response {
    let (parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
    let content_type = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let recorded_body = if content_type.starts_with("application/json") {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    } else {
        Value::Null
    };
    state.data().requests.push(RecordedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().trim_start_matches("/api").to_string(),
        query: parts.uri.query().unwrap_or_default().to_string(),
        body: recorded_body,
    });
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn reply(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

fn message(status: StatusCode, text: &str) -> Response {
    reply(status, json!({ "message": text }))
}

/// Dates come back as midnight UTC timestamps, the way Mongoose stores them
fn mongo_date(date: &Value) -> Value {
    match date.as_str() {
        Some(day) => json!(format!("{day}T00:00:00.000Z")),
        None => date.clone(),
    }
}

fn session_user(headers: &HeaderMap) -> Option<&'static TestUser> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    let token = cookies
        .split(';')
        .filter_map(|c| c.trim().split_once('='))
        .find(|(name, _)| *name == "token")
        .map(|(_, value)| value)?;
    USERS.iter().find(|u| u.id == token)
}

macro_rules! require_user {
    ($headers:expr) => {
        match session_user(&$headers) {
            Some(user) => user,
            None => return message(StatusCode::UNAUTHORIZED, "Not authorized, no token"),
        }
    };
}

macro_rules! require_admin {
    ($headers:expr) => {{
        let user = require_user!($headers);
        if !user.is_admin() {
            return message(StatusCode::FORBIDDEN, "Not authorized as an admin");
        }
        user
    }};
}

fn slugify(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn cart_body(items: &[Value]) -> Value {
    json!({ "items": items })
}

// ============================================================================
// Auth
// ============================================================================

async fn login(Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    match USERS.iter().find(|u| u.email == email) {
        Some(user) if user.password == password => (
            AppendHeaders([
                (header::SET_COOKIE, format!("token={}; Path=/; HttpOnly", user.id)),
                (header::SET_COOKIE, format!("user_role={}; Path=/", user.role)),
            ]),
            Json(json!({ "message": "Login successful", "user": user.to_json() })),
        )
            .into_response(),
        _ => message(StatusCode::UNAUTHORIZED, "Invalid email or password"),
    }
}

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let mut data = state.data();
    if USERS.iter().any(|u| u.email == email) || data.registered.contains(&email) {
        return message(StatusCode::BAD_REQUEST, "User already exists");
    }
    data.registered.push(email);
    message(StatusCode::CREATED, "Registration successful")
}

async fn logout() -> Response {
    (
        AppendHeaders([(
            header::SET_COOKIE,
            "token=; Path=/; HttpOnly; Max-Age=0".to_string(),
        )]),
        Json(json!({ "message": "Logged out" })),
    )
        .into_response()
}

async fn me(headers: HeaderMap) -> Response {
    let user = require_user!(headers);
    reply(StatusCode::OK, user.to_json())
}

// ============================================================================
// Categories
// ============================================================================

async fn list_categories(State(state): State<Shared>) -> Response {
    reply(StatusCode::OK, Value::Array(state.data().categories.clone()))
}

async fn get_category(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    if id == GATEWAY_DOWN_CATEGORY {
        return (
            StatusCode::BAD_GATEWAY,
            [(header::CONTENT_TYPE, "text/html")],
            "<html><body><h1>502 Bad Gateway</h1></body></html>",
        )
            .into_response();
    }
    match state.data().categories.iter().find(|c| c["_id"] == id.as_str()) {
        Some(c) => reply(StatusCode::OK, c.clone()),
        None => message(StatusCode::NOT_FOUND, "Category not found"),
    }
}

async fn create_category(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    require_user!(headers);
    let name = body["name"].as_str().unwrap_or_default().trim().to_string();
    if name.is_empty() {
        return message(StatusCode::BAD_REQUEST, "Category name is required");
    }
    let mut data = state.data();
    if data.categories.iter().any(|c| c["name"] == name.as_str()) {
        return message(StatusCode::BAD_REQUEST, "Category already exists");
    }
    let id = data.id("c");
    let category = json!({
        "_id": id,
        "name": name,
        "slug": slugify(&name),
        "description": body.get("description").cloned().unwrap_or(Value::Null),
        "isActive": true,
    });
    data.categories.push(category.clone());
    reply(StatusCode::CREATED, category)
}

async fn update_category(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    require_user!(headers);
    let mut data = state.data();
    let Some(category) = data.categories.iter_mut().find(|c| c["_id"] == id.as_str()) else {
        return message(StatusCode::NOT_FOUND, "Category not found");
    };
    if let Some(name) = body["name"].as_str() {
        category["name"] = json!(name);
        category["slug"] = json!(slugify(name));
    }
    if let Some(description) = body.get("description") {
        category["description"] = description.clone();
    }
    if let Some(active) = body["isActive"].as_bool() {
        category["isActive"] = json!(active);
    }
    reply(StatusCode::OK, category.clone())
}

async fn delete_category(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    require_user!(headers);
    if id == BROKEN_CATEGORY {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let mut data = state.data();
    let before = data.categories.len();
    data.categories.retain(|c| c["_id"] != id.as_str());
    if data.categories.len() == before {
        return message(StatusCode::NOT_FOUND, "Category not found");
    }
    message(StatusCode::OK, "Category deleted")
}

// ============================================================================
// Products
// ============================================================================

async fn list_products(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let search = query.get("search").map(|s| s.to_lowercase());
    let category = query.get("category");
    let products: Vec<Value> = state
        .data()
        .products
        .iter()
        .filter(|p| {
            let category_id = p["category"]["_id"]
                .as_str()
                .or_else(|| p["category"].as_str())
                .unwrap_or_default();
            category.is_none_or(|c| c == category_id)
        })
        .filter(|p| {
            search.as_ref().is_none_or(|s| {
                p["name"]
                    .as_str()
                    .unwrap_or_default()
                    .to_lowercase()
                    .contains(s)
            })
        })
        .cloned()
        .collect();
    reply(StatusCode::OK, Value::Array(products))
}

// ============================================================================
// Cash box
// ============================================================================

async fn list_session_types(State(state): State<Shared>) -> Response {
    reply(StatusCode::OK, Value::Array(state.data().session_types.clone()))
}

async fn create_session_type(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    require_user!(headers);
    let mut data = state.data();
    let id = data.id("st");
    let session_type = json!({
        "_id": id,
        "name": body["name"],
        "description": body.get("description").cloned().unwrap_or(Value::Null),
        "isActive": true,
    });
    data.session_types.push(session_type.clone());
    reply(StatusCode::CREATED, session_type)
}

async fn update_session_type(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    require_user!(headers);
    let mut data = state.data();
    let Some(session_type) = data.session_types.iter_mut().find(|t| t["_id"] == id.as_str())
    else {
        return message(StatusCode::NOT_FOUND, "Session type not found");
    };
    if let Some(active) = body["isActive"].as_bool() {
        session_type["isActive"] = json!(active);
    }
    if let Some(name) = body["name"].as_str() {
        session_type["name"] = json!(name);
    }
    reply(StatusCode::OK, session_type.clone())
}

async fn delete_session_type(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    require_user!(headers);
    let mut data = state.data();
    let in_use: HashSet<String> = data
        .sessions
        .iter()
        .filter_map(|s| s["sessionType"]["_id"].as_str().map(str::to_string))
        .collect();
    if in_use.contains(&id) {
        return message(StatusCode::BAD_REQUEST, IN_USE_MESSAGE);
    }
    data.session_types.retain(|t| t["_id"] != id.as_str());
    message(StatusCode::OK, "Session type deleted")
}

async fn list_sessions(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    require_user!(headers);
    let sessions: Vec<Value> = state
        .data()
        .sessions
        .iter()
        .filter(|s| {
            query
                .get("date")
                .is_none_or(|d| s["date"].as_str().is_some_and(|v| v.starts_with(d.as_str())))
        })
        .filter(|s| query.get("status").is_none_or(|st| s["status"] == st.as_str()))
        .cloned()
        .collect();
    reply(StatusCode::OK, Value::Array(sessions))
}

async fn open_session(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let user = require_user!(headers);
    let mut data = state.data();
    let type_id = body["sessionType"].as_str().unwrap_or_default().to_string();
    let Some(session_type) = data
        .session_types
        .iter()
        .find(|t| t["_id"] == type_id.as_str())
        .cloned()
    else {
        return message(StatusCode::BAD_REQUEST, "Invalid session type");
    };
    let id = data.id("cs");
    let session = json!({
        "_id": id,
        "date": mongo_date(&body["date"]),
        "sessionType": {"_id": type_id, "name": session_type["name"]},
        "openingAmount": body["openingAmount"],
        "status": "open",
        "notes": body.get("notes").cloned().unwrap_or(Value::Null),
        "openedBy": {"_id": user.id, "firstName": user.first_name, "lastName": user.last_name},
    });
    data.sessions.push(session.clone());
    reply(StatusCode::CREATED, session)
}

async fn close_session(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    require_user!(headers);
    let mut data = state.data();
    let Some(session) = data.sessions.iter_mut().find(|s| s["_id"] == id.as_str()) else {
        return message(StatusCode::NOT_FOUND, "Session not found");
    };
    if session["status"] == "closed" {
        return message(StatusCode::BAD_REQUEST, "Session is already closed");
    }
    session["closingAmount"] = body["closingAmount"].clone();
    session["status"] = json!("closed");
    reply(StatusCode::OK, session.clone())
}

// ============================================================================
// Cart
// ============================================================================

async fn get_cart(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let user = require_user!(headers);
    let data = state.data();
    let items = data.cart.get(user.id).cloned().unwrap_or_default();
    reply(StatusCode::OK, cart_body(&items))
}

async fn add_to_cart(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let user = require_user!(headers);
    let product_id = body["productId"].as_str().unwrap_or_default().to_string();
    let quantity = body["quantity"].as_u64().unwrap_or(1);
    let mut data = state.data();
    let Some(product) = data
        .products
        .iter()
        .find(|p| p["_id"] == product_id.as_str())
        .cloned()
    else {
        return message(StatusCode::NOT_FOUND, "Product not found");
    };
    if product["stock"].as_u64().unwrap_or(0) < quantity {
        return message(StatusCode::BAD_REQUEST, "Insufficient stock");
    }
    let item_id = data.id("ci");
    let items = data.cart.entry(user.id.to_string()).or_default();
    match items
        .iter_mut()
        .find(|i| i["product"]["_id"] == product_id.as_str())
    {
        Some(item) => {
            let current = item["quantity"].as_u64().unwrap_or(0);
            item["quantity"] = json!(current + quantity);
        }
        None => items.push(json!({
            "_id": item_id,
            "product": {"_id": product_id, "name": product["name"], "price": product["price"], "stock": product["stock"]},
            "quantity": quantity,
            "price": product["price"],
        })),
    }
    reply(StatusCode::OK, cart_body(items))
}

async fn update_cart_item(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let user = require_user!(headers);
    let mut data = state.data();
    let items = data.cart.entry(user.id.to_string()).or_default();
    let Some(item) = items.iter_mut().find(|i| i["_id"] == id.as_str()) else {
        return message(StatusCode::NOT_FOUND, "Cart item not found");
    };
    item["quantity"] = body["quantity"].clone();
    reply(StatusCode::OK, cart_body(items))
}

async fn remove_cart_item(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let user = require_user!(headers);
    let mut data = state.data();
    let items = data.cart.entry(user.id.to_string()).or_default();
    items.retain(|i| i["_id"] != id.as_str());
    reply(StatusCode::OK, cart_body(items))
}

async fn clear_cart(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let user = require_user!(headers);
    state.data().cart.remove(user.id);
    reply(StatusCode::OK, cart_body(&[]))
}

// ============================================================================
// Recipes and day plans
// ============================================================================

async fn list_recipes(State(state): State<Shared>, headers: HeaderMap) -> Response {
    require_user!(headers);
    reply(StatusCode::OK, Value::Array(state.data().recipes.clone()))
}

fn plan_from(id: &str, body: &Value) -> Value {
    json!({
        "_id": id,
        "date": mongo_date(&body["date"]),
        "shift": body["shift"],
        "recipes": body["recipes"],
        "notes": body.get("notes").cloned().unwrap_or(Value::Null),
        "tasksGenerated": false,
    })
}

async fn list_day_plans(State(state): State<Shared>, headers: HeaderMap) -> Response {
    require_user!(headers);
    reply(StatusCode::OK, Value::Array(state.data().day_plans.clone()))
}

async fn get_day_plan(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    require_user!(headers);
    match state.data().day_plans.iter().find(|p| p["_id"] == id.as_str()) {
        Some(plan) => reply(StatusCode::OK, plan.clone()),
        None => message(StatusCode::NOT_FOUND, "Day plan not found"),
    }
}

async fn create_day_plan(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    require_user!(headers);
    if body["recipes"].as_array().is_none_or(Vec::is_empty) {
        return message(StatusCode::BAD_REQUEST, "At least one recipe is required");
    }
    let mut data = state.data();
    let id = data.id("dp");
    let plan = plan_from(&id, &body);
    data.day_plans.push(plan.clone());
    reply(StatusCode::CREATED, plan)
}

async fn update_day_plan(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    require_user!(headers);
    let mut data = state.data();
    let Some(plan) = data.day_plans.iter_mut().find(|p| p["_id"] == id.as_str()) else {
        return message(StatusCode::NOT_FOUND, "Day plan not found");
    };
    *plan = plan_from(&id, &body);
    reply(StatusCode::OK, plan.clone())
}

async fn generate_tasks(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    require_user!(headers);
    let mut data = state.data();
    let Some(plan) = data.day_plans.iter().find(|p| p["_id"] == id.as_str()).cloned() else {
        return message(StatusCode::NOT_FOUND, "Day plan not found");
    };
    let mut tasks = Vec::new();
    for planned in plan["recipes"].as_array().cloned().unwrap_or_default() {
        let recipe_id = planned["recipe"].as_str().unwrap_or_default();
        let Some(recipe) = data
            .recipes
            .iter()
            .find(|r| r["_id"] == recipe_id)
            .cloned()
        else {
            continue;
        };
        for (index, step) in recipe["steps"]
            .as_array()
            .cloned()
            .unwrap_or_default()
            .iter()
            .enumerate()
        {
            let task_id = data.id("t");
            tasks.push(json!({
                "_id": task_id,
                "title": format!("{} - {}", recipe["name"].as_str().unwrap_or_default(), step["title"].as_str().unwrap_or_default()),
                "recipe": {"_id": recipe_id, "name": recipe["name"]},
                "stepIndex": index,
                "estimatedDuration": step["duration"],
                "location": step.get("location").cloned().unwrap_or(Value::Null),
                "priority": "medium",
                "status": "pending",
                "dayPlan": id,
            }));
        }
    }
    if let Some(plan) = data.day_plans.iter_mut().find(|p| p["_id"] == id.as_str()) {
        plan["tasksGenerated"] = json!(true);
    }
    reply(
        StatusCode::OK,
        json!({ "message": format!("Generated {} tasks", tasks.len()), "tasks": tasks }),
    )
}

// ============================================================================
// Orders and uploads
// ============================================================================

async fn place_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let user = require_user!(headers);
    let mut data = state.data();
    let items = data.cart.remove(user.id).unwrap_or_default();
    if items.is_empty() {
        return message(StatusCode::BAD_REQUEST, "Cart is empty");
    }
    let total: f64 = items
        .iter()
        .map(|i| i["price"].as_f64().unwrap_or(0.0) * i["quantity"].as_f64().unwrap_or(0.0))
        .sum();
    let id = data.id("o");
    let order = json!({
        "_id": id,
        "user": user.id,
        "items": items.iter().map(|i| json!({
            "product": i["product"]["_id"],
            "name": i["product"]["name"],
            "quantity": i["quantity"],
            "price": i["price"],
        })).collect::<Vec<_>>(),
        "totalAmount": total,
        "shippingAddress": body["shippingAddress"],
        "paymentMethod": body["paymentMethod"],
        "status": "pending",
    });
    data.orders.push(order.clone());
    reply(StatusCode::CREATED, order)
}

async fn all_orders(State(state): State<Shared>, headers: HeaderMap) -> Response {
    require_admin!(headers);
    reply(StatusCode::OK, Value::Array(state.data().orders.clone()))
}

async fn my_orders(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let user = require_user!(headers);
    let orders: Vec<Value> = state
        .data()
        .orders
        .iter()
        .filter(|o| o["user"] == user.id)
        .cloned()
        .collect();
    reply(StatusCode::OK, Value::Array(orders))
}

async fn update_order_status(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    require_admin!(headers);
    let mut data = state.data();
    let Some(order) = data.orders.iter_mut().find(|o| o["_id"] == id.as_str()) else {
        return message(StatusCode::NOT_FOUND, "Order not found");
    };
    order["status"] = body["status"].clone();
    reply(StatusCode::OK, order.clone())
}

// ============================================================================
// Settings and users
// ============================================================================

async fn get_settings(State(state): State<Shared>, headers: HeaderMap) -> Response {
    require_admin!(headers);
    reply(StatusCode::OK, state.data().settings.clone())
}

async fn save_settings(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    require_admin!(headers);
    let mut data = state.data();
    data.settings = body;
    reply(StatusCode::OK, data.settings.clone())
}

fn user_with_role(user: &TestUser, roles: &HashMap<String, String>) -> Value {
    let mut json = user.to_json();
    if let Some(role) = roles.get(user.id) {
        json["role"] = json!(role);
    }
    json
}

async fn list_users(State(state): State<Shared>, headers: HeaderMap) -> Response {
    require_admin!(headers);
    let data = state.data();
    let users: Vec<Value> = USERS.iter().map(|u| user_with_role(u, &data.roles)).collect();
    reply(StatusCode::OK, Value::Array(users))
}

async fn set_role(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    require_admin!(headers);
    let Some(user) = USERS.iter().find(|u| u.id == id) else {
        return message(StatusCode::NOT_FOUND, "User not found");
    };
    let role = body["role"].as_str().unwrap_or_default().to_string();
    let mut data = state.data();
    data.roles.insert(id, role);
    reply(StatusCode::OK, user_with_role(user, &data.roles))
}

async fn upload_image(headers: HeaderMap, mut multipart: Multipart) -> Response {
    require_user!(headers);
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("image") {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let bytes = field.bytes().await.unwrap_or_default();
            if bytes.is_empty() {
                return message(StatusCode::BAD_REQUEST, "Empty file");
            }
            return reply(
                StatusCode::OK,
                json!({ "url": format!("https://cdn.potlam.test/{file_name}") }),
            );
        }
    }
    message(StatusCode::BAD_REQUEST, "No image provided")
}
