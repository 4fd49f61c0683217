//! HTTP adapters for the landmark suggestion and place catalog services.
//!
//! Thin JSON-over-HTTP clients; the engine never talks to these types
//! directly, only through the boundary traits.

use async_trait::async_trait;
use serde::Deserialize;

use super::{
    CandidateLandmark, LandmarkSuggester, PlaceCatalog, PlaceDetails, PlaceQuery, ProviderError,
    RestaurantQuery, SuggestionRequest,
};

#[derive(Debug, Clone)]
pub struct SuggesterConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for SuggesterConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8600".to_string(),
            timeout_secs: 10,
        }
    }
}

/// HTTP client for the generative landmark service.
#[derive(Debug, Clone)]
pub struct HttpLandmarkSuggester {
    config: SuggesterConfig,
    client: reqwest::Client,
}

impl HttpLandmarkSuggester {
    pub fn new(config: SuggesterConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }
}

#[derive(Debug, Deserialize)]
struct SuggestionResponse {
    #[serde(default)]
    landmarks: Vec<CandidateLandmark>,
}

#[async_trait]
impl LandmarkSuggester for HttpLandmarkSuggester {
    async fn suggest_landmarks(
        &self,
        request: &SuggestionRequest,
    ) -> Result<Vec<CandidateLandmark>, ProviderError> {
        let url = format!("{}/v1/landmarks/suggest", self.config.base_url);
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body: SuggestionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;
        Ok(body.landmarks)
    }
}

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8610".to_string(),
            timeout_secs: 10,
        }
    }
}

/// HTTP client for the place-enrichment catalog.
#[derive(Debug, Clone)]
pub struct HttpPlaceCatalog {
    config: CatalogConfig,
    client: reqwest::Client,
}

impl HttpPlaceCatalog {
    pub fn new(config: CatalogConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    place: Option<PlaceDetails>,
}

#[derive(Debug, Deserialize)]
struct RestaurantsResponse {
    #[serde(default)]
    results: Vec<PlaceDetails>,
}

#[async_trait]
impl PlaceCatalog for HttpPlaceCatalog {
    async fn lookup_place(
        &self,
        query: &PlaceQuery,
    ) -> Result<Option<PlaceDetails>, ProviderError> {
        let url = format!("{}/v1/places/lookup", self.config.base_url);
        let response = self
            .client
            .post(url)
            .json(query)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body: LookupResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;
        Ok(body.place)
    }

    async fn find_restaurants(
        &self,
        query: &RestaurantQuery,
    ) -> Result<Vec<PlaceDetails>, ProviderError> {
        let url = format!("{}/v1/places/restaurants", self.config.base_url);
        let response = self
            .client
            .post(url)
            .json(query)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body: RestaurantsResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;
        Ok(body.results)
    }
}

fn map_transport_error(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout(std::time::Duration::from_secs(0))
    } else {
        ProviderError::Unavailable(error.to_string())
    }
}
