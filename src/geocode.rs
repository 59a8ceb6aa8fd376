// 🌍 Address Resolution - Google Geocoding collaborator
// Free text or postal code in, normalized address with postal code + province out
//
// Response interpretation is pure and always compiled; the HTTP client needs
// the `geocode` feature.

use crate::estimate::{estimate, EstimateResult};
use crate::postal::PostalCode;
use crate::region::Province;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Queries shorter than this that are not postal codes are rejected up front
pub const MIN_ADDRESS_LENGTH: usize = 5;

const MAP_EMBED_URL: &str = "https://www.google.com/maps/embed/v1/place";

// ============================================================================
// ERRORS
// ============================================================================

/// Display text is what the user sees
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeocodeError {
    #[error("Please enter a valid Canadian postal code or full address")]
    InputTooShort,

    #[error("Geocoding is not configured: GOOGLE_MAPS_API_KEY is not set")]
    MissingApiKey,

    #[error("Error validating address. Please try again.")]
    Request { reason: String },

    #[error("No results found for this address. Please try a different address or postal code.")]
    NoResults { status: String },

    #[error("Please enter a valid Canadian address with postal code")]
    MissingPostalCode,

    #[error("The provided postal code could not be found. Please verify and try again.")]
    PostalCodeMismatch { requested: String, found: String },
}

// ============================================================================
// RESOLUTION TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

impl AddressComponent {
    pub fn has_type(&self, tag: &str) -> bool {
        self.types.iter().any(|t| t == tag)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressResolution {
    pub display_name: String,
    pub lat: f64,
    pub lon: f64,
    pub components: Vec<AddressComponent>,
}

impl AddressResolution {
    /// First component carrying `tag`
    pub fn component(&self, tag: &str) -> Option<&AddressComponent> {
        self.components.iter().find(|c| c.has_type(tag))
    }

    pub fn postal_code(&self) -> Option<PostalCode> {
        self.component("postal_code")
            .map(|c| PostalCode::normalize(&c.long_name))
    }

    /// Province abbreviation as reported ("ON")
    pub fn province_abbreviation(&self) -> Option<&str> {
        self.component("administrative_area_level_1")
            .map(|c| c.short_name.as_str())
    }

    pub fn province(&self) -> Option<Province> {
        let area = self.component("administrative_area_level_1")?;
        Province::from_name(&area.short_name).or_else(|| Province::from_name(&area.long_name))
    }

    pub fn map_embed_url(&self, api_key: &str) -> String {
        format!(
            "{}?key={}&q={}",
            MAP_EMBED_URL,
            urlencoding::encode(api_key),
            urlencoding::encode(&self.display_name)
        )
    }
}

// ============================================================================
// SEARCH QUERY
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum SearchQuery {
    PostalCode(PostalCode),
    Address(String),
}

impl SearchQuery {
    /// Trim and uppercase the user's text, recognizing bare postal codes
    pub fn parse(input: &str) -> Result<Self, GeocodeError> {
        let cleaned = input.trim().to_uppercase();

        if let Ok(code) = PostalCode::parse(&cleaned) {
            return Ok(SearchQuery::PostalCode(code));
        }
        if cleaned.chars().count() < MIN_ADDRESS_LENGTH {
            return Err(GeocodeError::InputTooShort);
        }

        Ok(SearchQuery::Address(cleaned))
    }

    /// Text sent to the geocoder; postal codes get their province for context
    pub fn search_address(&self) -> String {
        match self {
            SearchQuery::PostalCode(code) => {
                let province = Province::from_postal_code(code)
                    .map(|p| p.name())
                    .unwrap_or("");
                format!("{}, {}, Canada", code, province)
            }
            SearchQuery::Address(text) => format!("{}, Canada", text),
        }
    }
}

// ============================================================================
// GOOGLE RESPONSE
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResult {
    pub formatted_address: String,
    pub geometry: Geometry,
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Turn a geocoder response into a resolution, applying the acceptance rules:
/// status OK with results, a postal code on the first result, and the same
/// postal code back when the user typed one.
pub fn interpret_response(
    query: &SearchQuery,
    response: GeocodeResponse,
) -> Result<AddressResolution, GeocodeError> {
    if response.status != "OK" || response.results.is_empty() {
        if let Some(message) = &response.error_message {
            tracing::warn!(status = %response.status, "Geocoder error: {}", message);
        }
        return Err(GeocodeError::NoResults {
            status: response.status,
        });
    }

    let Some(result) = response.results.into_iter().next() else {
        return Err(GeocodeError::NoResults {
            status: "ZERO_RESULTS".to_string(),
        });
    };

    let resolution = AddressResolution {
        display_name: result.formatted_address,
        lat: result.geometry.location.lat,
        lon: result.geometry.location.lng,
        components: result.address_components,
    };

    let found = resolution
        .postal_code()
        .ok_or(GeocodeError::MissingPostalCode)?;

    if let SearchQuery::PostalCode(requested) = query {
        if &found != requested {
            return Err(GeocodeError::PostalCodeMismatch {
                requested: requested.to_string(),
                found: found.to_string(),
            });
        }
    }

    Ok(resolution)
}

/// Estimate for a resolved address, using its postal code and province
pub fn estimate_for_resolution(
    resolution: &AddressResolution,
    size_override: Option<u32>,
) -> Result<EstimateResult, GeocodeError> {
    let code = resolution
        .postal_code()
        .ok_or(GeocodeError::MissingPostalCode)?;

    Ok(estimate(
        &code,
        resolution.province_abbreviation(),
        size_override,
    ))
}

// ============================================================================
// HTTP CLIENT
// ============================================================================

#[cfg(feature = "geocode")]
pub use client::{lookup, AddressResolver, GoogleGeocoder};

#[cfg(feature = "geocode")]
mod client {
    use super::*;
    use crate::config::Config;
    use async_trait::async_trait;
    use reqwest::Client;
    use secrecy::{ExposeSecret, SecretString};

    /// Anything that can turn a search query into an address
    #[async_trait]
    pub trait AddressResolver: Send + Sync {
        async fn resolve(&self, query: &SearchQuery) -> Result<AddressResolution, GeocodeError>;
    }

    pub struct GoogleGeocoder {
        client: Client,
        base_url: String,
        api_key: SecretString,
    }

    impl GoogleGeocoder {
        pub fn new(config: &Config) -> Result<Self, GeocodeError> {
            let api_key = config
                .maps_api_key
                .clone()
                .ok_or(GeocodeError::MissingApiKey)?;

            let client = Client::builder()
                .timeout(config.geocode_timeout)
                .build()
                .map_err(|e| GeocodeError::Request {
                    reason: e.to_string(),
                })?;

            Ok(GoogleGeocoder {
                client,
                base_url: config.geocode_base_url.clone(),
                api_key,
            })
        }
    }

    #[async_trait]
    impl AddressResolver for GoogleGeocoder {
        async fn resolve(&self, query: &SearchQuery) -> Result<AddressResolution, GeocodeError> {
            let address = query.search_address();
            tracing::debug!("Geocoding: {}", address);

            let response = self
                .client
                .get(&self.base_url)
                .query(&[
                    ("address", address.as_str()),
                    ("components", "country:CA"),
                    ("key", self.api_key.expose_secret()),
                ])
                .send()
                .await
                .map_err(|e| {
                    tracing::error!("Geocoding request failed: {}", e);
                    GeocodeError::Request {
                        reason: e.to_string(),
                    }
                })?;

            let status = response.status();
            if !status.is_success() {
                tracing::error!("Geocoder returned HTTP {}", status);
                return Err(GeocodeError::Request {
                    reason: format!("HTTP {}", status),
                });
            }

            let body: GeocodeResponse = response.json().await.map_err(|e| {
                tracing::error!("Geocoder response was not valid JSON: {}", e);
                GeocodeError::Request {
                    reason: e.to_string(),
                }
            })?;

            tracing::debug!(status = %body.status, results = body.results.len(), "Geocoder response");
            interpret_response(query, body)
        }
    }

    /// Validate the user's text, resolve it and estimate the property
    pub async fn lookup(
        resolver: &dyn AddressResolver,
        input: &str,
        size_override: Option<u32>,
    ) -> Result<(AddressResolution, EstimateResult), GeocodeError> {
        let query = SearchQuery::parse(input)?;
        let resolution = resolver.resolve(&query).await?;
        let result = estimate_for_resolution(&resolution, size_override)?;
        Ok((resolution, result))
    }
}

// ============================================================================
// TESTS
// ============================================================================
