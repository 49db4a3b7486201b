//! Loader options: retry budget, delay policy, cache-bust token and hooks.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ChunkLoadError;

pub const DEFAULT_MAX_RETRIES: u32 = 1;
pub const DEFAULT_CACHE_BUST: &str = "cache-bust=true";
pub const DEFAULT_CDN_HOST: &str = "https://cdn.example.com";

/// Retry budget as written by a user: a number or a numeric string.
///
/// Anything that is not a positive integer normalizes to `DEFAULT_MAX_RETRIES`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaxRetries {
    Int(i64),
    Float(f64),
    Text(String),
}

impl MaxRetries {
    pub fn normalize(&self) -> u32 {
        match self {
            MaxRetries::Int(n) if *n > 0 => u32::try_from(*n).unwrap_or(u32::MAX),
            MaxRetries::Int(_) => DEFAULT_MAX_RETRIES,
            MaxRetries::Float(f) => normalize_float(*f),
            MaxRetries::Text(s) => s
                .trim()
                .parse::<f64>()
                .map(normalize_float)
                .unwrap_or(DEFAULT_MAX_RETRIES),
        }
    }
}

fn normalize_float(f: f64) -> u32 {
    if f.is_finite() && f.fract() == 0.0 && f > 0.0 {
        if f >= u32::MAX as f64 {
            u32::MAX
        } else {
            f as u32
        }
    } else {
        DEFAULT_MAX_RETRIES
    }
}

impl From<i64> for MaxRetries {
    fn from(n: i64) -> Self {
        MaxRetries::Int(n)
    }
}

impl From<f64> for MaxRetries {
    fn from(f: f64) -> Self {
        MaxRetries::Float(f)
    }
}

impl From<&str> for MaxRetries {
    fn from(s: &str) -> Self {
        MaxRetries::Text(s.to_string())
    }
}

/// Delay before retry attempt `n` (1-based).
#[derive(Clone)]
pub enum RetryDelay {
    Fixed(Duration),
    Custom(Arc<dyn Fn(u32) -> Duration + Send + Sync>),
}

impl RetryDelay {
    pub fn custom(f: impl Fn(u32) -> Duration + Send + Sync + 'static) -> Self {
        RetryDelay::Custom(Arc::new(f))
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        match self {
            RetryDelay::Fixed(d) => *d,
            RetryDelay::Custom(f) => f(attempt),
        }
    }
}

impl Default for RetryDelay {
    fn default() -> Self {
        RetryDelay::Fixed(Duration::ZERO)
    }
}

impl fmt::Debug for RetryDelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryDelay::Fixed(d) => f.debug_tuple("Fixed").field(d).finish(),
            RetryDelay::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Source of the cache-busting token put in front of `&retry-attempt=N`.
#[derive(Clone, Default)]
pub enum CacheBust {
    #[default]
    Default,
    Static(String),
    Custom(Arc<dyn Fn() -> String + Send + Sync>),
}

impl CacheBust {
    pub fn custom(f: impl Fn() -> String + Send + Sync + 'static) -> Self {
        CacheBust::Custom(Arc::new(f))
    }

    pub fn token(&self) -> String {
        match self {
            CacheBust::Default => DEFAULT_CACHE_BUST.to_string(),
            CacheBust::Static(s) => s.clone(),
            CacheBust::Custom(f) => f(),
        }
    }
}

impl fmt::Debug for CacheBust {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheBust::Default => f.write_str("Default"),
            CacheBust::Static(s) => f.debug_tuple("Static").field(s).finish(),
            CacheBust::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Hook run on terminal failure, after the error is annotated.
pub type LastResort = Arc<dyn Fn(&ChunkLoadError) + Send + Sync>;

#[derive(Clone)]
pub struct LoaderOptions {
    /// Always at least 1; only set through `with_max_retries`.
    max_retries: u32,
    pub retry_delay: RetryDelay,
    pub cache_bust: CacheBust,
    /// Chunk names that get retry behavior; `None` covers every chunk.
    pub chunks: Option<Vec<String>>,
    pub last_resort: Option<LastResort>,
    /// CDN host the origin fallback switches back to.
    pub cdn_host: String,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: RetryDelay::default(),
            cache_bust: CacheBust::default(),
            chunks: None,
            last_resort: None,
            cdn_host: DEFAULT_CDN_HOST.to_string(),
        }
    }
}

impl LoaderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn with_max_retries(mut self, raw: impl Into<MaxRetries>) -> Self {
        self.max_retries = raw.into().normalize();
        self
    }

    pub fn with_retry_delay(mut self, delay: RetryDelay) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_cache_bust(mut self, cache_bust: CacheBust) -> Self {
        self.cache_bust = cache_bust;
        self
    }

    pub fn with_chunks<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chunks = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_last_resort(mut self, f: impl Fn(&ChunkLoadError) + Send + Sync + 'static) -> Self {
        self.last_resort = Some(Arc::new(f));
        self
    }

    pub fn with_cdn_host(mut self, host: impl Into<String>) -> Self {
        self.cdn_host = host.into();
        self
    }

    /// Query suffix for retry attempt `attempt`.
    pub(super) fn retry_query(&self, attempt: u32) -> String {
        format!("{}&retry-attempt={}", self.cache_bust.token(), attempt)
    }
}

impl fmt::Debug for LoaderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderOptions")
            .field("max_retries", &self.max_retries)
            .field("retry_delay", &self.retry_delay)
            .field("cache_bust", &self.cache_bust)
            .field("chunks", &self.chunks)
            .field("last_resort", &self.last_resort.is_some())
            .field("cdn_host", &self.cdn_host)
            .finish()
    }
}
