use serde::{Deserialize, Serialize};

/// Calibration pair used to turn Euclidean miles into travel minutes during
/// search. The defaults are provisional; once real travel data is available
/// for a finished route the orchestrator derives refined values from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TravelEstimate {
    /// Ratio of real road distance to Euclidean distance.
    pub distance_multiplier: f64,

    /// Average speed in miles per hour.
    pub average_speed_mph: f64,
}

impl Default for TravelEstimate {
    fn default() -> Self {
        Self {
            distance_multiplier: 1.0,
            average_speed_mph: 20.0,
        }
    }
}

impl TravelEstimate {
    /// Travel minutes for a distance already expressed in (multiplied)
    /// miles. A non-positive speed yields zero rather than a division by
    /// zero.
    pub fn travel_minutes(&self, distance_miles: f64) -> f64 {
        if self.average_speed_mph <= 0.0 {
            return 0.0;
        }
        distance_miles / self.average_speed_mph * 60.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_from_speed() {
        let estimate = TravelEstimate {
            distance_multiplier: 1.0,
            average_speed_mph: 30.0,
        };
        assert!((estimate.travel_minutes(15.0) - 30.0).abs() < 1e-12);
    }

    #[test]
    fn zero_speed_yields_zero_minutes() {
        let estimate = TravelEstimate {
            distance_multiplier: 1.0,
            average_speed_mph: 0.0,
        };
        assert_eq!(estimate.travel_minutes(10.0), 0.0);
    }
}
