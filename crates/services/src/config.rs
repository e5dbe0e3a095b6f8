use std::env;
use std::time::Duration;

use url::Url;

use study_core::model::UserId;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_USER_ID: &str = "local-user";

/// Where the backend lives and who is talking to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayConfig {
    base_url: Url,
    user_id: UserId,
    upload_timeout: Option<Duration>,
}

impl GatewayConfig {
    /// Build a config from raw values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the url does not parse, is not http(s), or the user id is blank.
    pub fn new(base_url: &str, user_id: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            user_id: UserId::new(user_id)?,
            upload_timeout: None,
        })
    }

    /// Read `STUDY_API_BASE_URL`, `STUDY_USER_ID` and `STUDY_UPLOAD_TIMEOUT_SECS`,
    /// falling back to local defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for values that are set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env::var("STUDY_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let user_id = env::var("STUDY_USER_ID").unwrap_or_else(|_| DEFAULT_USER_ID.into());
        let mut config = Self::new(&base_url, &user_id)?;
        if let Ok(raw) = env::var("STUDY_UPLOAD_TIMEOUT_SECS") {
            config.upload_timeout = parse_timeout(&raw)?;
        }
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `ConfigError` if the url is invalid.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url(raw)?;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUserId` if the id is blank.
    pub fn with_user_id(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.user_id = UserId::new(raw)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_upload_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.upload_timeout = timeout;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    #[must_use]
    pub fn upload_timeout(&self) -> Option<Duration> {
        self.upload_timeout
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let mut url = Url::parse(trimmed).map_err(|source| ConfigError::InvalidBaseUrl {
        raw: trimmed.to_owned(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme(trimmed.to_owned()));
    }
    // Endpoint paths are appended as segments, so keep the base path slash-terminated.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Seconds, whole or fractional. Zero disables the timeout.
///
/// # Errors
///
/// Returns `ConfigError::InvalidTimeout` for negative or non-numeric input.
pub fn parse_timeout(raw: &str) -> Result<Option<Duration>, ConfigError> {
    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidTimeout(raw.to_owned()))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(ConfigError::InvalidTimeout(raw.to_owned()));
    }
    if secs == 0.0 {
        return Ok(None);
    }
    Duration::try_from_secs_f64(secs)
        .map(Some)
        .map_err(|_| ConfigError::InvalidTimeout(raw.to_owned()))
}
