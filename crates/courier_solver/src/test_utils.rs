use jiff::Timestamp;

use crate::graph::{EdgeMode, Graph};
use crate::problem::location::LatLng;
use crate::problem::package::{Package, Priority};
use crate::problem::schedule_profile::ScheduleProfile;
use crate::problem::vehicle::Vehicle;

pub const PACKAGE_WEIGHT: f64 = 1.0;
pub const PACKAGE_VOLUME: f64 = 0.5;

pub const DEPOT: LatLng = LatLng {
    lat: 40.0,
    lng: -83.0,
};

/// A package at an offset (in hundredths of a degree) from the depot.
pub fn package_at(lat_offset: f64, lng_offset: f64) -> Package {
    let location = LatLng {
        lat: DEPOT.lat + lat_offset * 0.01,
        lng: DEPOT.lng + lng_offset * 0.01,
    };
    Package::new(
        format!("{:.4}, {:.4}", location.lat, location.lng),
        location,
        PACKAGE_WEIGHT,
        PACKAGE_VOLUME,
        Priority::Standard,
        Timestamp::UNIX_EPOCH,
    )
}

/// `n` packages spaced evenly along a line east of the depot.
pub fn line_packages(n: usize) -> Vec<Package> {
    (1..=n).map(|i| package_at(0.0, i as f64)).collect()
}

/// Graph over [`line_packages`], node 0 being the depot.
pub fn line_graph(n: usize, mode: EdgeMode) -> Graph {
    Graph::build(line_packages(n), DEPOT, mode, None)
}

pub fn vehicle(registration: &str) -> Vehicle {
    Vehicle::new(registration.to_owned(), 100.0, 50.0)
}

pub fn vehicles(n: usize) -> Vec<Vehicle> {
    (0..n).map(|i| vehicle(&format!("VAN-{i}"))).collect()
}

pub fn profile() -> ScheduleProfile {
    ScheduleProfile::default()
}
