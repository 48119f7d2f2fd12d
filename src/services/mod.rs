//! Services for fetching and aggregating driver data

pub mod aggregator;
pub mod api;
pub mod profile;

pub use aggregator::Aggregator;
pub use api::{ApiClient, DriverDataService, DEFAULT_API_URL};
pub use profile::{load_profile, DriverProfile, DriverSession};
