//! Configuration read from the environment.

use std::env;
use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::fs;
use std::path::Path;
use std::time::Duration;

use order_bot_core::DEFAULT_CUSTOMER_CARE_NUMBER;
use order_bot_core::catalog::Catalog;
use order_bot_gemini_model::{GeminiConfig, GeminiConfigBuilder};

/// Gemini API key. Required.
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
/// Gemini model name.
pub const MODEL_VAR: &str = "GEMINI_MODEL";
/// Gemini API base URL.
pub const BASE_URL_VAR: &str = "GEMINI_BASE_URL";
/// Whole-request timeout in seconds.
pub const TIMEOUT_VAR: &str = "GEMINI_TIMEOUT_SECS";
/// Contact number quoted in customer care mode.
pub const CUSTOMER_CARE_NUMBER_VAR: &str = "CUSTOMER_CARE_NUMBER";
/// Path to a JSON catalog file.
pub const CATALOG_VAR: &str = "ORDER_BOT_CATALOG";

/// The kind of a [`ConfigError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConfigErrorKind {
    /// A required variable is not set.
    MissingVar,
    /// A variable is set to something unusable.
    InvalidVar,
    /// The catalog file could not be read or parsed.
    Catalog,
}

/// Error returned when the configuration cannot be loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigError {
    kind: ConfigErrorKind,
    message: String,
}

impl ConfigError {
    fn missing(name: &str) -> Self {
        Self {
            kind: ConfigErrorKind::MissingVar,
            message: format!("{name} environment variable is not set"),
        }
    }

    fn invalid(name: &str, value: &str) -> Self {
        Self {
            kind: ConfigErrorKind::InvalidVar,
            message: format!("{name} has an invalid value: {value:?}"),
        }
    }

    fn catalog(path: &Path, reason: impl Display) -> Self {
        Self {
            kind: ConfigErrorKind::Catalog,
            message: format!("cannot load catalog {}: {reason}", path.display()),
        }
    }

    /// Returns the kind of the error.
    #[inline]
    pub fn kind(&self) -> ConfigErrorKind {
        self.kind
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for ConfigError {}

/// Everything the host needs to start a session.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Gemini provider settings.
    pub gemini: GeminiConfig,
    /// Contact number quoted in customer care mode.
    pub customer_care_number: String,
    /// Products on offer.
    pub catalog: Catalog,
}

impl AppConfig {
    /// Loads `.env` if there is one, then reads the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        match dotenv::dotenv() {
            Ok(path) => debug!("loaded {}", path.display()),
            Err(err) => debug!("no .env loaded: {err}"),
        }
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from a variable lookup. Blank values count
    /// as unset.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let api_key =
            var(API_KEY_VAR).ok_or_else(|| ConfigError::missing(API_KEY_VAR))?;
        let mut builder = GeminiConfigBuilder::with_api_key(api_key);
        if let Some(model) = var(MODEL_VAR) {
            builder = builder.with_model(model);
        }
        if let Some(base_url) = var(BASE_URL_VAR) {
            builder = builder.with_base_url(base_url);
        }
        if let Some(secs) = var(TIMEOUT_VAR) {
            let timeout = secs
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::invalid(TIMEOUT_VAR, &secs))?;
            builder = builder.with_timeout(Duration::from_secs(timeout));
        }

        let customer_care_number = var(CUSTOMER_CARE_NUMBER_VAR)
            .unwrap_or_else(|| DEFAULT_CUSTOMER_CARE_NUMBER.to_owned());
        let catalog = match var(CATALOG_VAR) {
            Some(path) => load_catalog(Path::new(&path))?,
            None => Catalog::default(),
        };

        Ok(Self {
            gemini: builder.build(),
            customer_care_number,
            catalog,
        })
    }
}

fn load_catalog(path: &Path) -> Result<Catalog, ConfigError> {
    let json = fs::read_to_string(path)
        .map_err(|err| ConfigError::catalog(path, err))?;
    let catalog = Catalog::from_json(&json)
        .map_err(|err| ConfigError::catalog(path, err))?;
    info!("loaded {} products from {}", catalog.len(), path.display());
    Ok(catalog)
}
