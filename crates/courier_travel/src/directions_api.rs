use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::chunking::{Waypoint, chunk_stops};
use crate::provider::RouteTravel;

const METERS_PER_MILE: f64 = 1609.0;

pub const API_KEY_ENV_VAR: &str = "DIRECTIONS_API_KEY";
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

#[derive(Debug, Error)]
pub enum DirectionsError {
    #[error("missing {API_KEY_ENV_VAR} environment variable")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("response contained no routes")]
    EmptyResponse,

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
}

/// Client for a Google-Directions-style routing API.
///
/// A request carries at most 25 stops (origin, waypoints, destination), so
/// longer routes are split through [`chunk_stops`] and the per-leg results
/// are summed across chunks.
pub struct DirectionsClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl DirectionsClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }

    pub fn from_env() -> Result<Self, DirectionsError> {
        let api_key =
            std::env::var(API_KEY_ENV_VAR).map_err(|_| DirectionsError::MissingApiKey)?;
        Ok(Self::new(api_key))
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Fetches actual travel distance and duration along the given ordered
    /// stops (depot first and last for a closed route).
    pub async fn route_travel(&self, stops: &[Waypoint]) -> Result<RouteTravel, DirectionsError> {
        let mut total_distance_miles = 0.0;
        let mut total_duration_mins = 0.0;

        for chunk in chunk_stops(stops) {
            let response = self.request_chunk(&chunk).await?;
            let route = response
                .routes
                .first()
                .ok_or(DirectionsError::EmptyResponse)?;

            for leg in &route.legs {
                total_distance_miles += leg.distance.value / METERS_PER_MILE;
                total_duration_mins += leg.duration.value / 60.0;
            }
        }

        debug!(
            stops = stops.len(),
            distance_miles = total_distance_miles,
            duration_mins = total_duration_mins,
            "fetched route travel data"
        );

        Ok(RouteTravel {
            distance_miles: total_distance_miles,
            duration_mins: total_duration_mins,
        })
    }

    async fn request_chunk(
        &self,
        chunk: &[Waypoint],
    ) -> Result<DirectionsResponse, DirectionsError> {
        let format_point = |p: &Waypoint| format!("{},{}", p[0], p[1]);

        let origin = format_point(&chunk[0]);
        let destination = format_point(&chunk[chunk.len() - 1]);
        let waypoints = chunk[1..chunk.len() - 1]
            .iter()
            .map(format_point)
            .collect::<Vec<_>>()
            .join("|");

        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("origin", origin.as_str()),
                ("destination", destination.as_str()),
                ("waypoints", waypoints.as_str()),
                ("mode", "driving"),
                ("units", "imperial"),
                ("avoid", "tolls"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DirectionsError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.json::<DirectionsResponse>().await?)
    }
}

#[derive(Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<ApiRoute>,
}

#[derive(Deserialize)]
struct ApiRoute {
    #[serde(default)]
    legs: Vec<ApiLeg>,
}

#[derive(Deserialize)]
struct ApiLeg {
    distance: ApiValue,
    duration: ApiValue,
}

/// Distance values are meters, duration values are seconds.
#[derive(Deserialize)]
struct ApiValue {
    value: f64,
}
