//! HTTP client for network-based API calls
//!
//! One calling convention throughout: every call resolves to the typed body
//! or a [`ClientError`]. A 401 never returns data: it issues the hard login
//! redirect through the [`Navigator`] and yields `ClientError::Unauthorized`.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::{ApiErrorBody, ErrorCategory};
use shared::models::UploadedImage;

use crate::config::ClientConfig;
use crate::cookie::CookieJar;
use crate::error::{ClientError, ClientResult};
use crate::navigation::{Navigator, is_auth_route};

/// Query parameter appended outside production
pub const CACHE_BUST_PARAM: &str = "_t";

/// Multipart field name expected by `POST /upload/image`
pub const IMAGE_FIELD: &str = "image";

/// HTTP client trait
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    async fn get_query<T: DeserializeOwned, Q: Serialize + Sync>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T>;
    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    async fn upload_image(&self, file_name: &str, bytes: Vec<u8>) -> ClientResult<UploadedImage>;

    /// Cookies sent with every request
    fn cookie_jar(&self) -> &CookieJar;

    /// Router used for the 401 redirect
    fn navigator(&self) -> &Arc<dyn Navigator>;

    /// Route the 401 redirect targets
    fn login_path(&self) -> &str;
}

/// Network HTTP client
#[derive(Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    cache_busting: bool,
    login_path: String,
    cookies: Arc<CookieJar>,
    navigator: Arc<dyn Navigator>,
}

impl std::fmt::Debug for NetworkHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkHttpClient")
            .field("base_url", &self.base_url)
            .field("cache_busting", &self.cache_busting)
            .field("login_path", &self.login_path)
            .finish_non_exhaustive()
    }
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig, navigator: Arc<dyn Navigator>) -> ClientResult<Self> {
        let cookies = Arc::new(CookieJar::new());
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .cookie_provider(cookies.clone())
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cache_busting: config.cache_busting(),
            login_path: config.login_path.clone(),
            cookies,
            navigator,
        })
    }

    /// Base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.client.request(method, self.url(path));
        if self.cache_busting {
            req.query(&[(CACHE_BUST_PARAM, shared::util::now_millis())])
        } else {
            req
        }
    }

    async fn send<T: DeserializeOwned>(&self, path: &str, req: RequestBuilder) -> ClientResult<T> {
        let response = req.send().await.map_err(|e| {
            tracing::warn!(path = %path, error = %e, "Request failed");
            ClientError::from(e)
        })?;
        self.handle_response(path, response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> ClientResult<T> {
        let status = response.status();
        tracing::debug!(path = %path, status = status.as_u16(), "Response");

        if status == StatusCode::UNAUTHORIZED {
            self.redirect_to_login(path);
            return Err(ClientError::Unauthorized);
        }

        if !status.is_success() {
            let text = response.text().await?;
            // Only a JSON message reaches the user; anything else is logged
            let message = ApiErrorBody::message_from(&text).unwrap_or_default();
            tracing::warn!(
                path = %path,
                status = status.as_u16(),
                message = %message,
                body = %text.trim(),
                "API error"
            );
            let category = ErrorCategory::from_status(status);
            return Err(ClientError::from_status(category, status.as_u16(), message));
        }

        let bytes = response.bytes().await?;
        let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &bytes
        };
        serde_json::from_slice(body)
            .map_err(|e| ClientError::InvalidResponse(format!("{path}: {e}")))
    }

    fn redirect_to_login(&self, path: &str) {
        let current = self.navigator.current_path();
        if is_auth_route(&current) {
            tracing::debug!(path = %path, current = %current, "401 on auth route, no redirect");
            return;
        }
        tracing::info!(path = %path, from = %current, "Session rejected, redirecting to login");
        self.navigator.hard_redirect(&self.login_path);
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let req = self.request(Method::GET, path);
        self.send(path, req).await
    }

    async fn get_query<T: DeserializeOwned, Q: Serialize + Sync>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T> {
        let req = self.request(Method::GET, path).query(query);
        self.send(path, req).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let req = self.request(Method::POST, path).json(body);
        self.send(path, req).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let req = self.request(Method::POST, path);
        self.send(path, req).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let req = self.request(Method::PUT, path).json(body);
        self.send(path, req).await
    }

    async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let req = self.request(Method::PATCH, path).json(body);
        self.send(path, req).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let req = self.request(Method::DELETE, path);
        self.send(path, req).await
    }

    async fn upload_image(&self, file_name: &str, bytes: Vec<u8>) -> ClientResult<UploadedImage> {
        let mime = mime_for(file_name);
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)?;
        let form = reqwest::multipart::Form::new().part(IMAGE_FIELD, part);

        let path = "/upload/image";
        let req = self.request(Method::POST, path).multipart(form);
        let uploaded: UploadedImage = self.send(path, req).await?;
        tracing::info!(file = %file_name, url = %uploaded.url, "Image uploaded");
        Ok(uploaded)
    }

    fn cookie_jar(&self) -> &CookieJar {
        &self.cookies
    }

    fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    fn login_path(&self) -> &str {
        &self.login_path
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}
