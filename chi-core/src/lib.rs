//! Deployment deduplication & cluster addressing for ClickHouse installations.
//!
//! The types here are built once per generation pass from a `ClickHouseInstallation` and then
//! read by the manifest generator. See `model::DeploymentModel::build`.

pub mod config;
pub mod crd;
pub mod error;
pub mod model;

pub use config::Config;
pub use error::ChiError;
pub use model::DeploymentModel;
