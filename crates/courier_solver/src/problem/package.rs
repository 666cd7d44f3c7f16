use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::location::LatLng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Redelivery,
    Express,
    Standard,
}

/// An immutable delivery request. The solver only ever reads packages; all
/// routing state lives in [`crate::solution::route::Route`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    id: Uuid,
    recipient_address: String,
    location: LatLng,
    weight: f64,
    volume: f64,
    priority: Priority,
    created_at: Timestamp,
}

impl Package {
    pub fn new(
        recipient_address: String,
        location: LatLng,
        weight: f64,
        volume: f64,
        priority: Priority,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipient_address,
            location,
            weight,
            volume,
            priority,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn recipient_address(&self) -> &str {
        &self.recipient_address
    }

    pub fn location(&self) -> LatLng {
        self.location
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}
