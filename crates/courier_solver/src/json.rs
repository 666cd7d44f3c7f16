use serde::Deserialize;
use thiserror::Error;

use crate::problem::location::LatLng;
use crate::problem::package::{Package, Priority};
use crate::problem::schedule_profile::ScheduleProfile;
use crate::problem::travel_estimate::TravelEstimate;
use crate::problem::vehicle::Vehicle;
use crate::scheduler::ScheduleRequest;

#[derive(Debug, Error)]
pub enum ScheduleInputError {
    #[error("failed to read input file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse input file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// On-disk description of one scheduling run.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleInput {
    pub depot: [f64; 2],
    pub packages: Vec<PackageInput>,
    pub vehicles: Vec<VehicleInput>,
    pub profile: Option<ScheduleProfile>,
    pub estimate: Option<TravelEstimate>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageInput {
    pub recipient_address: String,
    pub coordinates: [f64; 2],
    pub weight: f64,
    pub volume: f64,
    pub priority: Option<Priority>,
    pub created_at: Option<jiff::Timestamp>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VehicleInput {
    pub registration: String,
    pub max_load: f64,
    pub max_volume: f64,
}

impl ScheduleInput {
    pub fn from_file(path: &std::path::Path) -> Result<Self, ScheduleInputError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn create_request(self, seed: Option<u64>) -> ScheduleRequest {
        let packages = self
            .packages
            .into_iter()
            .map(|input| {
                Package::new(
                    input.recipient_address,
                    LatLng::new(input.coordinates[0], input.coordinates[1]),
                    input.weight,
                    input.volume,
                    input.priority.unwrap_or(Priority::Standard),
                    input.created_at.unwrap_or_else(jiff::Timestamp::now),
                )
            })
            .collect();

        let vehicles = self
            .vehicles
            .into_iter()
            .map(|input| Vehicle::new(input.registration, input.max_load, input.max_volume))
            .collect();

        ScheduleRequest {
            packages,
            vehicles,
            depot: LatLng::new(self.depot[0], self.depot[1]),
            profile: self.profile.unwrap_or_default(),
            estimate: self.estimate.unwrap_or_default(),
            seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_input_parses_with_defaults() {
        let input: ScheduleInput = serde_json::from_str(
            r#"{
                "depot": [40.0, -83.0],
                "packages": [
                    {
                        "recipient_address": "1 Main St",
                        "coordinates": [40.01, -83.02],
                        "weight": 2.5,
                        "volume": 1.0
                    }
                ],
                "vehicles": [
                    { "registration": "VAN-1", "max_load": 100.0, "max_volume": 50.0 }
                ]
            }"#,
        )
        .unwrap();

        let request = input.create_request(Some(1));
        assert_eq!(request.packages.len(), 1);
        assert_eq!(request.packages[0].priority(), Priority::Standard);
        assert_eq!(request.vehicles[0].registration(), "VAN-1");
        assert_eq!(request.profile.generations, 1_000_000);
        assert!((request.estimate.average_speed_mph - 20.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<ScheduleInput, _> = serde_json::from_str(
            r#"{ "depot": [0.0, 0.0], "packages": [], "vehicles": [], "bogus": true }"#,
        );
        assert!(result.is_err());
    }
}
