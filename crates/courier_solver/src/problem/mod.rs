pub mod location;
pub mod package;
pub mod schedule_profile;
pub mod travel_estimate;
pub mod vehicle;
