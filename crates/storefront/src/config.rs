//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SIMPSHOPY_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `SIMPSHOPY_ROOT_DOMAIN` - Platform root domain (e.g., platform.tld)
//!
//! ## Optional
//! - `SIMPSHOPY_HOST` - Bind address (default: 127.0.0.1)
//! - `SIMPSHOPY_PORT` - Listen port (default: 3000)
//! - `SIMPSHOPY_ADMIN_HOST` - Admin console host (default: admin.{root})
//! - `SIMPSHOPY_STORE_PATH_PREFIX` - Path prefix for path-addressed stores (default: /store/)
//! - `SIMPSHOPY_PUBLIC_SCHEME` - Scheme used in redirects (default: https)
//! - `SIMPSHOPY_RESERVED_SLUGS` - Comma separated list replacing the default reserved slugs
//! - `SIMPSHOPY_TRUST_FORWARDED_HOST` - Use `X-Forwarded-Host` for routing (default: false)
//! - `SIMPSHOPY_TENANT_CACHE_TTL_SECS` - Tenant lookup cache TTL, 0 disables (default: 300)
//! - `SIMPSHOPY_TENANT_CACHE_CAPACITY` - Tenant lookup cache size (default: 10000)
//! - `SIMPSHOPY_INTERNAL_TOKEN` - Bearer token for internal endpoints (high entropy)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - Sentry sampling (default: 1.0)

use std::collections::{BTreeSet, HashMap};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use simpshopy_core::Hostname;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const MIN_INTERNAL_TOKEN_LENGTH: usize = 32;

/// Slugs that can never be assigned to a tenant.
pub const DEFAULT_RESERVED_SLUGS: &[&str] = &[
    "www", "admin", "api", "app", "mail", "shop", "store", "support", "help", "docs", "cdn",
    "static", "assets", "images", "files", "test", "staging", "dev", "demo", "preview", "beta",
    "alpha",
];

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct SimpshopyConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Hostname routing rules
    pub routing: RoutingConfig,
    /// Tenant lookup cache settings
    pub cache: CacheConfig,
    /// Route on `X-Forwarded-Host` instead of `Host` (only behind a trusted proxy)
    pub trust_forwarded_host: bool,
    /// Bearer token for `/internal` endpoints; `None` disables them
    pub internal_token: Option<SecretString>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Rules for mapping hostnames and paths onto the platform or a tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingConfig {
    root_domain: Hostname,
    www_domain: Hostname,
    admin_host: Hostname,
    store_path_prefix: String,
    public_scheme: String,
    reserved_slugs: BTreeSet<String>,
}

/// Tenant lookup cache settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Entry time-to-live; zero disables the cache.
    pub ttl: Duration,
    /// Maximum number of cached lookups.
    pub capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            capacity: 10_000,
        }
    }
}

impl CacheConfig {
    /// Whether caching is switched on.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        !self.ttl.is_zero() && self.capacity > 0
    }
}

impl SimpshopyConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid, or
    /// if the internal token fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("SIMPSHOPY_DATABASE_URL")?;
        let host = parse_env("SIMPSHOPY_HOST", "127.0.0.1")?;
        let port = parse_env("SIMPSHOPY_PORT", "3000")?;
        let routing = RoutingConfig::from_env()?;
        let cache = CacheConfig {
            ttl: Duration::from_secs(parse_env("SIMPSHOPY_TENANT_CACHE_TTL_SECS", "300")?),
            capacity: parse_env("SIMPSHOPY_TENANT_CACHE_CAPACITY", "10000")?,
        };
        let trust_forwarded_host = parse_env("SIMPSHOPY_TRUST_FORWARDED_HOST", "false")?;
        let internal_token = get_optional_env("SIMPSHOPY_INTERNAL_TOKEN")
            .map(|token| {
                validate_internal_token(&token, "SIMPSHOPY_INTERNAL_TOKEN")?;
                Ok::<_, ConfigError>(SecretString::from(token))
            })
            .transpose()?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            database_url,
            host,
            port,
            routing,
            cache,
            trust_forwarded_host,
            internal_token,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl RoutingConfig {
    /// Routing rules for `root_domain` with every other setting at its default.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `root_domain` is not a valid hostname.
    pub fn new(root_domain: &str) -> Result<Self, ConfigError> {
        let root_domain = parse_host("SIMPSHOPY_ROOT_DOMAIN", root_domain)?;
        let www_domain = root_domain
            .with_label("www")
            .map_err(|e| invalid("SIMPSHOPY_ROOT_DOMAIN", e))?;
        let admin_host = root_domain
            .with_label("admin")
            .map_err(|e| invalid("SIMPSHOPY_ROOT_DOMAIN", e))?;

        Ok(Self {
            root_domain,
            www_domain,
            admin_host,
            store_path_prefix: "/store/".to_owned(),
            public_scheme: "https".to_owned(),
            reserved_slugs: DEFAULT_RESERVED_SLUGS
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
        })
    }

    fn from_env() -> Result<Self, ConfigError> {
        let mut routing = Self::new(&get_required_env("SIMPSHOPY_ROOT_DOMAIN")?)?;

        if let Some(admin_host) = get_optional_env("SIMPSHOPY_ADMIN_HOST") {
            routing = routing.with_admin_host(&admin_host)?;
        }
        if let Some(prefix) = get_optional_env("SIMPSHOPY_STORE_PATH_PREFIX") {
            routing = routing.with_store_path_prefix(&prefix)?;
        }
        if let Some(scheme) = get_optional_env("SIMPSHOPY_PUBLIC_SCHEME") {
            routing = routing.with_public_scheme(&scheme)?;
        }
        if let Some(slugs) = get_optional_env("SIMPSHOPY_RESERVED_SLUGS") {
            routing = routing.with_reserved_slugs(slugs.split(','));
        }

        Ok(routing)
    }

    /// Override the admin console host.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `host` is not a valid hostname.
    pub fn with_admin_host(mut self, host: &str) -> Result<Self, ConfigError> {
        self.admin_host = parse_host("SIMPSHOPY_ADMIN_HOST", host)?;
        Ok(self)
    }

    /// Override the store path prefix. It must start and end with `/`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the prefix is malformed.
    pub fn with_store_path_prefix(mut self, prefix: &str) -> Result<Self, ConfigError> {
        if prefix.len() < 3 || !prefix.starts_with('/') || !prefix.ends_with('/') {
            return Err(ConfigError::InvalidEnvVar(
                "SIMPSHOPY_STORE_PATH_PREFIX".to_string(),
                format!("{prefix:?} must look like /segment/"),
            ));
        }
        self.store_path_prefix = prefix.to_ascii_lowercase();
        Ok(self)
    }

    /// Override the scheme used when building redirect targets.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` unless the scheme is `http` or `https`.
    pub fn with_public_scheme(mut self, scheme: &str) -> Result<Self, ConfigError> {
        let scheme = scheme.trim().to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(ConfigError::InvalidEnvVar(
                "SIMPSHOPY_PUBLIC_SCHEME".to_string(),
                format!("{scheme:?} must be http or https"),
            ));
        }
        self.public_scheme = scheme;
        Ok(self)
    }

    /// Replace the reserved slug list. Entries are trimmed and lower-cased.
    #[must_use]
    pub fn with_reserved_slugs<I, S>(mut self, slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.reserved_slugs = slugs
            .into_iter()
            .map(|s| s.as_ref().trim().to_ascii_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        self
    }

    /// The platform root domain.
    #[must_use]
    pub const fn root_domain(&self) -> &Hostname {
        &self.root_domain
    }

    /// The admin console host.
    #[must_use]
    pub const fn admin_host(&self) -> &Hostname {
        &self.admin_host
    }

    /// The store path prefix, e.g. `/store/`.
    #[must_use]
    pub fn store_path_prefix(&self) -> &str {
        &self.store_path_prefix
    }

    /// Reserved slugs, sorted.
    pub fn reserved_slugs(&self) -> impl Iterator<Item = &str> {
        self.reserved_slugs.iter().map(String::as_str)
    }

    /// Whether `host` is the platform root or its `www` alias.
    #[must_use]
    pub fn is_platform_root(&self, host: &Hostname) -> bool {
        *host == self.root_domain || *host == self.www_domain
    }

    /// Whether `host` is the admin console host.
    #[must_use]
    pub fn is_admin_host(&self, host: &Hostname) -> bool {
        *host == self.admin_host
    }

    /// Whether `host` sits exactly one label below the platform root, the
    /// only place a subdomain can name a store.
    #[must_use]
    pub fn is_platform_subdomain(&self, host: &Hostname) -> bool {
        *host != self.root_domain
            && host.is_within(&self.root_domain)
            && host.as_str().len() == host.first_label().len() + 1 + self.root_domain.as_str().len()
    }

    /// Whether `slug` may never be assigned to a tenant.
    #[must_use]
    pub fn is_reserved_slug(&self, slug: &str) -> bool {
        self.reserved_slugs.contains(slug)
    }

    /// Whether a subdomain label must never be looked up as a tenant slug:
    /// `www`, the admin host's label, or any reserved slug.
    #[must_use]
    pub fn is_reserved_label(&self, label: &str) -> bool {
        label == "www" || label == self.admin_host.first_label() || self.is_reserved_slug(label)
    }

    /// Whether `path` addresses a store by path.
    #[must_use]
    pub fn is_store_path(&self, path: &str) -> bool {
        path.to_ascii_lowercase().starts_with(&self.store_path_prefix)
    }

    /// The slug segment of a store path (`/store/{slug}/...`), if any.
    #[must_use]
    pub fn store_path_slug<'p>(&self, path: &'p str) -> Option<&'p str> {
        if !self.is_store_path(path) {
            return None;
        }
        let rest = path.get(self.store_path_prefix.len()..)?;
        let segment = rest.split(['/', '?', '#']).next().unwrap_or_default();
        (!segment.is_empty()).then_some(segment)
    }

    /// Absolute URL of `path` on the platform root host.
    #[must_use]
    pub fn platform_url(&self, path: &str) -> String {
        let base = format!("{}://{}", self.public_scheme, self.root_domain);
        Url::parse(&base)
            .and_then(|url| url.join(path))
            .map_or_else(|_| format!("{base}{path}"), String::from)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value and parse it.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .trim()
        .parse::<T>()
        .map_err(|e| invalid(key, e))
}

fn parse_host(key: &str, value: &str) -> Result<Hostname, ConfigError> {
    Hostname::parse(value).map_err(|e| invalid(key, e))
}

fn invalid(key: &str, err: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), err.to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a token is long enough, not a placeholder, and has sufficient entropy.
fn validate_internal_token(token: &str, var_name: &str) -> Result<(), ConfigError> {
    if token.len() < MIN_INTERNAL_TOKEN_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {MIN_INTERNAL_TOKEN_LENGTH} characters (got {})",
                token.len()
            ),
        ));
    }

    let lower = token.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(token);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}
