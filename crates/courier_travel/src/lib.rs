pub mod chunking;
pub mod directions_api;
pub mod provider;
