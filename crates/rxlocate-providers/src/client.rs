//! HTTP client for the Nominatim search API.
//!
//! Implements both [`MapSearchProvider`] (pharmacy search inside a bounded
//! view box around the searcher) and [`AddressGeocoder`] (free-text US address
//! validation) on top of the single `/search` endpoint.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use rxlocate_core::{
    bounding_box, distance_miles, AddressGeocoder, AddressValidation, AppConfig, CandidateSource,
    LatLon, MapSearchProvider, PharmacyCandidate, PROVIDER_SEARCH_RADIUS_MILES,
};

use crate::error::ProviderError;
use crate::retry::retry_with_backoff;
use crate::types::{ExtraTags, SearchPlace};

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/";
const SEARCH_LIMIT: &str = "20";

/// Connection settings for [`NominatimClient`].
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: "rxlocate/0.1 (pharmacy-locator)".to_string(),
            timeout_secs: 10,
            max_retries: 2,
            backoff_base_ms: 500,
        }
    }
}

impl NominatimConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.geocoder_base_url.clone(),
            user_agent: config.geocoder_user_agent.clone(),
            timeout_secs: config.geocoder_timeout_secs,
            max_retries: config.geocoder_max_retries,
            backoff_base_ms: config.geocoder_backoff_base_ms,
        }
    }
}

/// Client for the Nominatim `/search` endpoint.
///
/// Use [`NominatimClient::new`] for production or
/// [`NominatimClient::with_base_url`] to point at a mock server in tests.
pub struct NominatimClient {
    client: Client,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl NominatimClient {
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ProviderError::InvalidBaseUrl`] if the
    /// configured base URL does not parse.
    pub fn new(config: &NominatimConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(config.user_agent.as_str())
            .build()?;

        // Exactly one trailing slash so `search` lands under any path prefix.
        let normalised = format!("{}/", config.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| ProviderError::InvalidBaseUrl(format!("{}: {e}", config.base_url)))?;

        Ok(Self {
            client,
            base_url,
            max_retries: config.max_retries,
            backoff_base_ms: config.backoff_base_ms,
        })
    }

    /// Default settings against a custom base URL, without back-off delay.
    ///
    /// # Errors
    ///
    /// Same as [`NominatimClient::new`].
    pub fn with_base_url(base_url: &str) -> Result<Self, ProviderError> {
        Self::new(&NominatimConfig {
            base_url: base_url.to_string(),
            backoff_base_ms: 0,
            ..NominatimConfig::default()
        })
    }

    /// Pharmacies matching `query` within the provider radius of `origin`, in
    /// the provider's relevance order.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::RateLimited`] / [`ProviderError::UnexpectedStatus`]
    ///   on non-2xx responses that survive the retry budget.
    /// - [`ProviderError::Http`] on network failure.
    /// - [`ProviderError::Deserialize`] if the body is not a result array.
    pub async fn search_pharmacies(
        &self,
        query: &str,
        origin: LatLon,
    ) -> Result<Vec<PharmacyCandidate>, ProviderError> {
        let bbox = bounding_box(origin, PROVIDER_SEARCH_RADIUS_MILES);
        let viewbox = format!(
            "{},{},{},{}",
            bbox.min_lon, bbox.max_lat, bbox.max_lon, bbox.min_lat
        );
        let url = self.build_url(&[
            ("q", query),
            ("viewbox", viewbox.as_str()),
            ("bounded", "1"),
            ("extratags", "1"),
            ("limit", SEARCH_LIMIT),
        ]);

        let places = self.fetch_places(&url).await?;
        let total = places.len();
        let candidates: Vec<PharmacyCandidate> = places
            .into_iter()
            .filter(SearchPlace::is_pharmacy)
            .filter_map(|place| to_candidate(place, origin))
            .filter(|c| c.distance_miles.is_some_and(|d| d <= PROVIDER_SEARCH_RADIUS_MILES))
            .collect();

        tracing::debug!(
            query,
            total,
            kept = candidates.len(),
            "nominatim pharmacy search"
        );
        Ok(candidates)
    }

    /// Validate a free-text address, taking the first US match.
    ///
    /// # Errors
    ///
    /// Same as [`NominatimClient::search_pharmacies`]. "No match" is not an
    /// error; it yields [`AddressValidation::invalid`].
    pub async fn validate_address(&self, address: &str) -> Result<AddressValidation, ProviderError> {
        let address = address.trim();
        if address.is_empty() {
            return Ok(AddressValidation::invalid());
        }

        let url = self.build_url(&[("q", address), ("countrycodes", "us"), ("limit", "5")]);
        let places = self.fetch_places(&url).await?;

        let matched = places
            .iter()
            .filter(|p| p.country_code().is_none_or(|cc| cc.eq_ignore_ascii_case("us")))
            .find_map(|p| p.coords().map(|coords| (p, coords)));

        Ok(match matched {
            Some((place, coords)) => AddressValidation {
                valid: true,
                coordinates: Some(coords),
                normalized_address: Some(place.one_line_address()),
            },
            None => AddressValidation::invalid(),
        })
    }

    /// Builds `{base}/search` with the fixed output parameters plus `extra`,
    /// percent-encoded through [`Url::query_pairs_mut`].
    fn build_url(&self, extra: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&format!("{}search", url.path()));
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("format", "jsonv2");
            pairs.append_pair("addressdetails", "1");
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    async fn fetch_places(&self, url: &Url) -> Result<Vec<SearchPlace>, ProviderError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.request_places(url)
        })
        .await
    }

    /// Single GET attempt: maps 429 and other non-2xx statuses to typed errors
    /// and parses the body as a result array.
    async fn request_places(&self, url: &Url) -> Result<Vec<SearchPlace>, ProviderError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }
        if !status.is_success() {
            return Err(ProviderError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ProviderError::Deserialize {
            context: url.path().to_string(),
            source: e,
        })
    }
}

fn to_candidate(place: SearchPlace, origin: LatLon) -> Option<PharmacyCandidate> {
    let Some(coords) = place.coords() else {
        tracing::debug!(osm_id = place.osm_id, "skipping place with unparsable coordinates");
        return None;
    };
    let full_address = place.one_line_address();
    let name = place
        .name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| full_address.clone());

    Some(PharmacyCandidate {
        source_id: place.source_id(),
        name,
        full_address,
        source: CandidateSource::Authoritative,
        distance_miles: Some(distance_miles(origin, coords)),
        phone_number: place
            .extratags
            .as_ref()
            .and_then(ExtraTags::phone)
            .map(str::to_string),
        coords: Some(coords),
    })
}

impl MapSearchProvider for NominatimClient {
    type Error = ProviderError;

    async fn search(
        &self,
        query: &str,
        origin: LatLon,
    ) -> Result<Vec<PharmacyCandidate>, ProviderError> {
        self.search_pharmacies(query, origin).await
    }
}

impl AddressGeocoder for NominatimClient {
    type Error = ProviderError;

    async fn validate(&self, address: &str) -> Result<AddressValidation, ProviderError> {
        self.validate_address(address).await
    }
}
