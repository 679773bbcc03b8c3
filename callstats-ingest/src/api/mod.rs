//! HTTP API handlers for callstats-ingest

pub mod health;
pub mod results;
pub mod submissions;
pub mod upload;

pub use health::health_routes;
pub use results::results_routes;
pub use submissions::submission_routes;
pub use upload::upload_routes;
