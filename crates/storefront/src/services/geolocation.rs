//! IP geolocation for the location banner.
//!
//! Looks up the visitor's city and country with an ip-api.com compatible
//! service. Lookups never fail from the caller's point of view: every error
//! collapses into [`Location::Unavailable`], which renders a fixed fallback.

use std::net::IpAddr;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::config::GeolocationConfig;

/// Shown when the lookup fails for any reason.
pub const UNAVAILABLE_TEXT: &str = "Localização Indisponível";

/// Substituted when the service omits the city.
const UNKNOWN_CITY: &str = "Desconhecida";

/// Substituted when the service omits the country.
const FALLBACK_COUNTRY: &str = "Mauro Business";

/// Errors from the geolocation lookup. Only logged, never returned to handlers.
#[derive(Debug, Error)]
enum LookupError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned status {0}")]
    Status(u16),
}

/// Outcome of a geolocation lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// The service answered with a (possibly partial) location.
    Resolved {
        city: Option<String>,
        country: Option<String>,
    },
    /// Transport error, timeout, bad status or malformed body.
    Unavailable,
}

impl Location {
    /// Banner text, e.g. `Luanda, Angola`.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Resolved { city, country } => format!(
                "{}, {}",
                city.as_deref().unwrap_or(UNKNOWN_CITY),
                country.as_deref().unwrap_or(FALLBACK_COUNTRY)
            ),
            Self::Unavailable => UNAVAILABLE_TEXT.to_string(),
        }
    }

    /// Whether the lookup produced an answer.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }
}

/// Response body of the lookup service. Every field is optional; failed
/// lookups (`"status": "fail"`) simply omit city and country.
#[derive(Debug, Deserialize)]
struct LookupResponse {
    city: Option<String>,
    country: Option<String>,
}

impl From<LookupResponse> for Location {
    fn from(body: LookupResponse) -> Self {
        Self::Resolved {
            city: body.city,
            country: body.country,
        }
    }
}

/// HTTP client for the geolocation service.
#[derive(Clone)]
pub struct GeoLocator {
    client: reqwest::Client,
    base_url: Url,
}

impl GeoLocator {
    /// Create a new geolocation client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &GeolocationConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Resolve the location of a client address.
    ///
    /// A loopback client is looked up with an empty address, which makes the
    /// service report the server's own public location.
    #[tracing::instrument(skip(self))]
    pub async fn resolve(&self, client_ip: IpAddr) -> Location {
        let address = lookup_address(client_ip);

        match self.fetch(&address).await {
            Ok(body) => body.into(),
            Err(e) => {
                tracing::debug!(error = %e, "Geolocation lookup failed");
                Location::Unavailable
            }
        }
    }

    async fn fetch(&self, address: &str) -> Result<LookupResponse, LookupError> {
        let response = self.client.get(self.lookup_url(address)).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        Ok(response.json().await?)
    }

    /// Build `{base_url}/{address}`.
    fn lookup_url(&self, address: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(address);
        }
        url
    }
}

/// Address sent to the service: empty for loopback, the IP otherwise.
fn lookup_address(client_ip: IpAddr) -> String {
    if client_ip.is_loopback() {
        String::new()
    } else {
        client_ip.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use axum::{Json, Router, http::StatusCode, routing::get};
    use serde_json::json;

    use super::*;

    /// Serve canned ip-api style answers on an ephemeral local port and
    /// return the server's base URL.
    async fn spawn_lookup_service() -> String {
        let app = Router::new()
            .route(
                "/ok/json/{ip}",
                get(|| async { Json(json!({"city": "Luanda", "country": "Angola"})) }),
            )
            .route(
                "/ok/json/",
                get(|| async { Json(json!({"status": "success", "city": "Lisboa"})) }),
            )
            .route("/malformed/json/{ip}", get(|| async { "<html>oops</html>" }))
            .route(
                "/limited/json/{ip}",
                get(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
            )
            .route(
                "/slow/json/{ip}",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(3)).await;
                    Json(json!({"city": "Luanda", "country": "Angola"}))
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{addr}")
    }

    fn locator(base_url: &str) -> GeoLocator {
        GeoLocator::new(&GeolocationConfig {
            base_url: Url::parse(base_url).unwrap(),
            timeout: Duration::from_millis(500),
        })
        .unwrap()
    }

    #[test]
    fn test_loopback_is_sent_as_empty_address() {
        assert_eq!(lookup_address("127.0.0.1".parse().unwrap()), "");
        assert_eq!(lookup_address("::1".parse().unwrap()), "");
        assert_eq!(lookup_address("41.63.10.2".parse().unwrap()), "41.63.10.2");
    }

    #[test]
    fn test_lookup_url_appends_address() {
        let geo = locator("http://ip-api.com/json");
        assert_eq!(
            geo.lookup_url("41.63.10.2").as_str(),
            "http://ip-api.com/json/41.63.10.2"
        );
        assert_eq!(geo.lookup_url("").as_str(), "http://ip-api.com/json/");

        let trailing = locator("http://ip-api.com/json/");
        assert_eq!(
            trailing.lookup_url("41.63.10.2").as_str(),
            "http://ip-api.com/json/41.63.10.2"
        );
    }

    #[test]
    fn test_display_full_and_partial() {
        let full = Location::Resolved {
            city: Some("Luanda".to_string()),
            country: Some("Angola".to_string()),
        };
        assert_eq!(full.display(), "Luanda, Angola");

        let partial = Location::Resolved {
            city: None,
            country: None,
        };
        assert_eq!(partial.display(), "Desconhecida, Mauro Business");
        assert!(partial.is_resolved());
    }

    #[test]
    fn test_display_unavailable() {
        assert_eq!(Location::Unavailable.display(), "Localização Indisponível");
        assert!(!Location::Unavailable.is_resolved());
    }

    #[test]
    fn test_response_with_missing_fields_parses() {
        let body: LookupResponse =
            serde_json::from_str(r#"{"status":"fail","message":"reserved range"}"#).unwrap();
        assert_eq!(
            Location::from(body).display(),
            "Desconhecida, Mauro Business"
        );
    }

    #[tokio::test]
    async fn test_unreachable_service_falls_back() {
        // Port 9 (discard) is not listening on the loopback interface.
        let geo = locator("http://127.0.0.1:9/json");
        let location = geo.resolve("127.0.0.1".parse().unwrap()).await;
        assert_eq!(location, Location::Unavailable);
    }

    #[tokio::test]
    async fn test_public_address_resolves_city_and_country() {
        let base = spawn_lookup_service().await;
        let geo = locator(&format!("{base}/ok/json"));

        let location = geo.resolve("41.63.10.2".parse().unwrap()).await;
        assert!(location.is_resolved());
        assert_eq!(location.display(), "Luanda, Angola");
    }

    #[tokio::test]
    async fn test_loopback_client_is_looked_up_without_address() {
        let base = spawn_lookup_service().await;
        let geo = locator(&format!("{base}/ok/json"));

        let location = geo.resolve("127.0.0.1".parse().unwrap()).await;
        assert_eq!(location.display(), "Lisboa, Mauro Business");
    }

    #[tokio::test]
    async fn test_malformed_body_falls_back() {
        let base = spawn_lookup_service().await;
        let geo = locator(&format!("{base}/malformed/json"));

        let location = geo.resolve("41.63.10.2".parse().unwrap()).await;
        assert_eq!(location, Location::Unavailable);
    }

    #[tokio::test]
    async fn test_error_status_falls_back() {
        let base = spawn_lookup_service().await;
        let geo = locator(&format!("{base}/limited/json"));

        let location = geo.resolve("41.63.10.2".parse().unwrap()).await;
        assert_eq!(location, Location::Unavailable);
    }

    #[tokio::test]
    async fn test_slow_service_times_out() {
        let base = spawn_lookup_service().await;
        let geo = locator(&format!("{base}/slow/json"));

        let started = std::time::Instant::now();
        let location = geo.resolve("41.63.10.2".parse().unwrap()).await;
        assert_eq!(location, Location::Unavailable);
        assert!(started.elapsed() < Duration::from_secs(3));
    }
}
