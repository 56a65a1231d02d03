//! OSRM table service client.
//!
//! OSRM API documentation:
//! https://project-osrm.org/docs/v5.24.0/api/#table-service
//!
//! URL building and response parsing are always compiled; the HTTP fetch
//! itself needs the `osrm` feature.

use serde::Deserialize;

use super::CostMatrix;
use crate::error::{Result, RoutingError};
use crate::models::Coordinates;

/// OSRM client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct OsrmConfig {
    /// Base URL of the OSRM server.
    pub base_url: String,
    /// Routing profile (`driving`, `cycling`, ...).
    pub profile: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://router.project-osrm.org".to_string(),
            profile: "driving".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl OsrmConfig {
    /// Creates a configuration for the given server.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Builds the table request URL for `coordinates`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dispatch_routing::distance::OsrmConfig;
    /// use dispatch_routing::models::Coordinates;
    ///
    /// let url = OsrmConfig::new("http://localhost:5000").table_url(&[
    ///     Coordinates::new(13.38886, 52.517037),
    ///     Coordinates::new(13.397634, 52.529407),
    /// ]);
    /// assert_eq!(
    ///     url,
    ///     concat!(
    ///         "http://localhost:5000/table/v1/driving/",
    ///         "13.38886,52.517037;13.397634,52.529407?annotations=distance"
    ///     )
    /// );
    /// ```
    pub fn table_url(&self, coordinates: &[Coordinates]) -> String {
        let coords = coordinates
            .iter()
            .map(|c| format!("{},{}", c.lon, c.lat))
            .collect::<Vec<_>>()
            .join(";");
        format!(
            "{}/table/v1/{}/{}?annotations=distance",
            self.base_url.trim_end_matches('/'),
            self.profile,
            coords
        )
    }
}

#[derive(Debug, Deserialize)]
struct TableResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    distances: Option<Vec<Vec<Option<f64>>>>,
}

/// Parses an OSRM table response body into an `expected`×`expected` matrix.
///
/// Distances are rounded to whole metres. A non-`Ok` code, a missing table,
/// unreachable pairs (`null`) or a wrong size are all reported as
/// [`RoutingError::MatrixUnavailable`].
pub fn parse_table(body: &str, expected: usize) -> Result<CostMatrix> {
    let response: TableResponse = serde_json::from_str(body)
        .map_err(|e| RoutingError::matrix(format!("invalid OSRM response: {e}")))?;

    if response.code != "Ok" {
        return Err(RoutingError::matrix(format!(
            "OSRM returned {}: {}",
            response.code,
            response.message.unwrap_or_default()
        )));
    }
    let table = response
        .distances
        .ok_or_else(|| RoutingError::matrix("OSRM response has no distances"))?;
    if table.len() != expected || table.iter().any(|row| row.len() != expected) {
        return Err(RoutingError::matrix(format!(
            "OSRM table is not {expected}x{expected}"
        )));
    }

    let mut matrix = CostMatrix::new(expected);
    for (i, row) in table.into_iter().enumerate() {
        for (j, cell) in row.into_iter().enumerate() {
            match cell {
                Some(d) if d.is_finite() && d >= 0.0 => matrix.set(i, j, d.round() as i64),
                _ => {
                    return Err(RoutingError::matrix(format!(
                        "OSRM has no route from location {i} to {j}"
                    )))
                }
            }
        }
    }
    Ok(matrix)
}

#[cfg(feature = "osrm")]
pub use client::OsrmProvider;

#[cfg(feature = "osrm")]
mod client {
    use std::time::Duration;

    use reqwest::blocking::Client;
    use tracing::{debug, warn};

    use super::{parse_table, OsrmConfig};
    use crate::distance::{CostMatrix, MatrixProvider};
    use crate::error::{Result, RoutingError};
    use crate::models::Coordinates;

    /// Matrix provider backed by an OSRM server.
    pub struct OsrmProvider {
        client: Client,
        config: OsrmConfig,
    }

    impl OsrmProvider {
        /// Creates a provider; fails if the HTTP client cannot be built.
        pub fn new(config: OsrmConfig) -> Result<Self> {
            let client = Client::builder()
                .timeout(Duration::from_secs(config.timeout_seconds))
                .build()
                .map_err(|e| RoutingError::matrix(format!("failed to create HTTP client: {e}")))?;
            Ok(Self { client, config })
        }
    }

    impl MatrixProvider for OsrmProvider {
        fn matrix(&self, coordinates: &[Coordinates]) -> Result<CostMatrix> {
            let url = self.config.table_url(coordinates);
            debug!(locations = coordinates.len(), "requesting OSRM table");

            let response = self
                .client
                .get(&url)
                .send()
                .map_err(|e| RoutingError::matrix(format!("OSRM request failed: {e}")))?;
            let status = response.status();
            let body = response
                .text()
                .map_err(|e| RoutingError::matrix(format!("failed to read OSRM response: {e}")))?;
            if !status.is_success() {
                warn!(%status, "OSRM table request failed");
                return Err(RoutingError::matrix(format!("OSRM returned HTTP {status}")));
            }
            parse_table(&body, coordinates.len())
        }

        fn name(&self) -> &str {
            "osrm"
        }
    }
}
