//! HTTP coordinate resolver combining postal lookup, geocoding and caching.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use waypost_core::{Coordinates, Geocoder};

use super::cache::GeocodeCache;
use super::limiter::RequestSpacing;
use super::nominatim::Place;
use super::postal::{PostalAddress, normalise_postal_code};
use crate::error::ProviderBuildError;

/// Default geocoding base URL.
pub const DEFAULT_GEOCODING_URL: &str = "https://nominatim.openstreetmap.org";

/// Default postal lookup base URL.
pub const DEFAULT_POSTAL_URL: &str = "https://viacep.com.br";

/// Country appended to addresses expanded from a postal code.
pub const DEFAULT_COUNTRY: &str = "Brasil";

const DEFAULT_USER_AGENT: &str = "waypost-geocoding/0.1";
const DEFAULT_TIMEOUT_SECS: u64 = 5;
const DEFAULT_MIN_SPACING: Duration = Duration::from_secs(1);

/// Configuration for [`HttpCoordinateResolver`].
#[derive(Debug, Clone)]
pub struct GeocodingConfig {
    /// Base URL of the Nominatim-compatible search service.
    pub geocoding_url: String,
    /// Base URL of the ViaCEP-compatible postal lookup service.
    pub postal_url: String,
    /// Timeout applied to every outbound request.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Minimum interval between geocoding requests across all callers.
    pub min_request_spacing: Duration,
    /// Country appended to postal-code addresses.
    pub country: String,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            geocoding_url: DEFAULT_GEOCODING_URL.to_owned(),
            postal_url: DEFAULT_POSTAL_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            min_request_spacing: DEFAULT_MIN_SPACING,
            country: DEFAULT_COUNTRY.to_owned(),
        }
    }
}

impl GeocodingConfig {
    /// Create a configuration pointing both services at custom base URLs.
    #[must_use]
    pub fn new(geocoding_url: impl Into<String>, postal_url: impl Into<String>) -> Self {
        Self {
            geocoding_url: geocoding_url.into(),
            postal_url: postal_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the minimum spacing between geocoding requests.
    #[must_use]
    pub const fn with_min_request_spacing(mut self, spacing: Duration) -> Self {
        self.min_request_spacing = spacing;
        self
    }

    /// Set the country appended to postal-code addresses.
    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }
}

/// Resolves addresses and postal codes to coordinates over HTTP.
///
/// Failures never reach the caller: anything that cannot be resolved yields
/// `None` and a `warn` log line.
///
/// # Example
///
/// ```no_run
/// use waypost_data::HttpCoordinateResolver;
///
/// # async fn run() -> Result<(), waypost_data::ProviderBuildError> {
/// let resolver = HttpCoordinateResolver::new()?;
/// if let Some(position) = resolver.resolve("01310-100").await {
///     println!("{position}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HttpCoordinateResolver {
    client: Client,
    config: GeocodingConfig,
    cache: GeocodeCache,
    spacing: RequestSpacing,
}

impl HttpCoordinateResolver {
    /// Create a resolver against the public default services.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new() -> Result<Self, ProviderBuildError> {
        Self::with_config(GeocodingConfig::default())
    }

    /// Create a resolver with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_config(config: GeocodingConfig) -> Result<Self, ProviderBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let spacing = RequestSpacing::new(config.min_request_spacing);
        Ok(Self {
            client,
            config,
            cache: GeocodeCache::default(),
            spacing,
        })
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &GeocodingConfig {
        &self.config
    }

    /// Resolve a free-text address or postal code.
    ///
    /// Blank input returns `None` without any request. Inputs with exactly
    /// eight digits are treated as postal codes and expanded first; an
    /// unknown code returns `None` without geocoding the raw digits.
    pub async fn resolve(&self, query: &str) -> Option<Coordinates> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            log::debug!("geocode: blank query");
            return None;
        }

        let postal_code = normalise_postal_code(trimmed);
        let cache_key = postal_code.as_deref().unwrap_or(trimmed);
        if let Some(hit) = self.cache.get(cache_key) {
            log::debug!("geocode cache hit for {cache_key:?}");
            return Some(hit);
        }
        log::debug!("geocode cache miss for {cache_key:?}");

        let Some(code) = postal_code else {
            let coordinates = self.geocode(trimmed).await?;
            self.cache.insert(trimmed, coordinates);
            return Some(coordinates);
        };

        let address = self.lookup_postal_code(&code).await?;
        let coordinates = match self.cache.get(&address) {
            Some(hit) => {
                log::debug!("geocode cache hit for expanded address {address:?}");
                hit
            }
            None => self.geocode(&address).await?,
        };
        self.cache.insert(address, coordinates);
        self.cache.insert(code, coordinates);
        Some(coordinates)
    }

    /// Drop every cached resolution.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Number of cached keys.
    #[must_use]
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    async fn lookup_postal_code(&self, code: &str) -> Option<String> {
        let url = format!(
            "{}/ws/{code}/json/",
            self.config.postal_url.trim_end_matches('/')
        );
        let address: PostalAddress = match self.get_json(&url, &[]).await {
            Ok(address) => address,
            Err(err) => {
                log::warn!("postal lookup for {code} failed: {err}");
                return None;
            }
        };
        if address.is_error() {
            log::warn!("postal lookup: unknown postal code {code}");
            return None;
        }
        let query = address.to_query(&self.config.country);
        if query.is_none() {
            log::warn!("postal lookup for {code} returned no address");
        }
        query
    }

    async fn geocode(&self, address: &str) -> Option<Coordinates> {
        self.spacing.acquire().await;

        let url = format!(
            "{}/search",
            self.config.geocoding_url.trim_end_matches('/')
        );
        let places: Vec<Place> = match self
            .get_json(&url, &[("q", address), ("format", "json"), ("limit", "1")])
            .await
        {
            Ok(places) => places,
            Err(err) => {
                log::warn!("geocoding {address:?} failed: {err}");
                return None;
            }
        };

        let coordinates = places.first().and_then(Place::coordinates);
        if coordinates.is_none() {
            log::warn!("geocoding {address:?} returned no usable result");
        }
        coordinates
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, reqwest::Error> {
        self.client
            .get(url)
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

#[async_trait]
impl Geocoder for HttpCoordinateResolver {
    async fn resolve(&self, query: &str) -> Option<Coordinates> {
        Self::resolve(self, query).await
    }
}
