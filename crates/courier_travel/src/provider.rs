use serde::Serialize;

use crate::chunking::Waypoint;
use crate::directions_api::{DirectionsClient, DirectionsError};

const MILES_PER_DEGREE: f64 = 69.172;

/// Actual travel data for one complete route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteTravel {
    pub distance_miles: f64,
    pub duration_mins: f64,
}

/// Source of real-world travel distance and duration for a finished route.
///
/// `AsTheCrowFlies` is the offline fallback: it prices each leg at the scaled
/// Euclidean distance, which is the same approximation the solver uses during
/// search.
pub enum TravelProvider {
    DirectionsApi { client: DirectionsClient },
    AsTheCrowFlies { speed_mph: f64, distance_multiplier: f64 },
}

impl TravelProvider {
    pub fn directions_from_env() -> Result<Self, DirectionsError> {
        Ok(TravelProvider::DirectionsApi {
            client: DirectionsClient::from_env()?,
        })
    }

    pub async fn route_travel(&self, stops: &[Waypoint]) -> Result<RouteTravel, DirectionsError> {
        match self {
            TravelProvider::DirectionsApi { client } => client.route_travel(stops).await,
            TravelProvider::AsTheCrowFlies {
                speed_mph,
                distance_multiplier,
            } => Ok(as_the_crow_flies(stops, *speed_mph, *distance_multiplier)),
        }
    }
}

fn as_the_crow_flies(stops: &[Waypoint], speed_mph: f64, distance_multiplier: f64) -> RouteTravel {
    let mut distance_miles = 0.0;
    for pair in stops.windows(2) {
        let dlat = pair[0][0] - pair[1][0];
        let dlng = pair[0][1] - pair[1][1];
        distance_miles += dlat.hypot(dlng) * MILES_PER_DEGREE * distance_multiplier;
    }

    let duration_mins = if speed_mph > 0.0 {
        distance_miles / speed_mph * 60.0
    } else {
        0.0
    };

    RouteTravel {
        distance_miles,
        duration_mins,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn crow_flies_prices_each_leg() {
        let provider = TravelProvider::AsTheCrowFlies {
            speed_mph: 30.0,
            distance_multiplier: 1.0,
        };

        // Two legs of 0.1 degrees each.
        let stops = [[0.0, 0.0], [0.1, 0.0], [0.2, 0.0]];
        let travel = provider.route_travel(&stops).await.unwrap();

        let expected_miles = 0.2 * 69.172;
        assert!((travel.distance_miles - expected_miles).abs() < 1e-9);
        assert!((travel.duration_mins - expected_miles / 30.0 * 60.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn crow_flies_guards_zero_speed() {
        let provider = TravelProvider::AsTheCrowFlies {
            speed_mph: 0.0,
            distance_multiplier: 1.0,
        };

        let travel = provider.route_travel(&[[0.0, 0.0], [1.0, 1.0]]).await.unwrap();
        assert_eq!(travel.duration_mins, 0.0);
    }
}
