//! Master-data assurance

pub mod service;

pub use service::{MasterDataService, MasterOutcome};
