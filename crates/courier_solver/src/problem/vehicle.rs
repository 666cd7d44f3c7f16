use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::define_index_newtype;

define_index_newtype!(VehicleIdx, Vehicle);

/// A read-only capacity profile for one delivery vehicle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    id: Uuid,
    registration: String,
    max_load: f64,
    max_volume: f64,
}

impl Vehicle {
    pub fn new(registration: String, max_load: f64, max_volume: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            registration,
            max_load,
            max_volume,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn registration(&self) -> &str {
        &self.registration
    }

    /// Maximum load weight the vehicle can carry.
    pub fn max_load(&self) -> f64 {
        self.max_load
    }

    /// Maximum load volume the vehicle can carry.
    pub fn max_volume(&self) -> f64 {
        self.max_volume
    }
}
