pub mod cli;
pub mod config;
pub mod deploy;
pub mod enumerate;
pub mod error;
pub mod load_config;
pub mod mime;
pub mod store;

pub use config::DeployConfig;
pub use deploy::{DeployReport, UploadFailure};
pub use enumerate::UploadTarget;
pub use error::DeployError;
pub use store::{ObjectStore, StoreError};
