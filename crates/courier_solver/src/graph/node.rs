use crate::define_index_newtype;
use crate::problem::location::LatLng;
use crate::problem::package::Package;

define_index_newtype!(NodeIdx, Node);

/// A graph vertex: either the single depot node or a node wrapping exactly
/// one package's delivery location.
#[derive(Debug, Clone)]
pub struct Node {
    package: Option<Package>,
    location: LatLng,
    is_depot: bool,
}

impl Node {
    pub(super) fn depot(location: LatLng) -> Self {
        Self {
            package: None,
            location,
            is_depot: true,
        }
    }

    pub(super) fn package(package: Package) -> Self {
        Self {
            location: package.location(),
            package: Some(package),
            is_depot: false,
        }
    }

    pub fn package_ref(&self) -> Option<&Package> {
        self.package.as_ref()
    }

    pub fn location(&self) -> LatLng {
        self.location
    }

    pub fn is_depot(&self) -> bool {
        self.is_depot
    }

    /// Package weight, or zero for the depot.
    pub fn weight(&self) -> f64 {
        self.package.as_ref().map_or(0.0, |p| p.weight())
    }

    /// Package volume, or zero for the depot.
    pub fn volume(&self) -> f64 {
        self.package.as_ref().map_or(0.0, |p| p.volume())
    }
}
