//! Accounting daemon port and response handling

pub mod ports;
pub mod response;

pub use ports::{RequestClass, TallyGateway};
pub use response::{extract_line_error, is_already_exists};
