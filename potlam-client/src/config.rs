//! Client configuration

/// Default API base URL
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Deployment environment
///
/// Everything except `Production` appends a cache-busting query parameter
/// to every request so preview deployments never see stale CDN responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Preview,
    Production,
}

impl Environment {
    /// Parse from an environment variable value; unknown values are
    /// treated as development.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "preview" | "staging" => Self::Preview,
            _ => Self::Development,
        }
    }
}

/// Client configuration for connecting to the Potlam API
///
/// # Environment variables
///
/// | variable | default | meaning |
/// |----------|---------|---------|
/// | POTLAM_API_URL | http://localhost:5000/api | API base URL |
/// | POTLAM_ENV | development | development / preview / production |
/// | POTLAM_TIMEOUT_SECS | 30 | request timeout in seconds |
/// | POTLAM_LOGIN_PATH | /auth/login | route to redirect to on 401 |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (e.g., "http://localhost:5000/api")
    pub base_url: String,

    /// Deployment environment
    pub environment: Environment,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Login route used for the 401 redirect
    pub login_path: String,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            environment: Environment::Development,
            timeout: 30,
            login_path: crate::navigation::LOGIN_PATH.to_string(),
        }
    }

    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("POTLAM_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into()),
            environment: std::env::var("POTLAM_ENV")
                .map(|v| Environment::parse(&v))
                .unwrap_or_default(),
            timeout: std::env::var("POTLAM_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            login_path: std::env::var("POTLAM_LOGIN_PATH")
                .unwrap_or_else(|_| crate::navigation::LOGIN_PATH.into()),
        }
    }

    /// Set the deployment environment
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the login route
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// Whether requests carry the cache-busting parameter
    pub fn cache_busting(&self) -> bool {
        self.environment != Environment::Production
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
