//! Layer Pusher Library
//!
//! This file serves as the library root for the layer-pusher crate,
//! organizing and exposing the modules that make up the push pipeline.

pub mod config;
pub mod digest;
pub mod error;
pub mod logging;
pub mod registry;
pub mod upload;

pub use config::ClientConfig;
pub use error::{PushError, Result};
pub use logging::Logger;
pub use registry::{RegistryHttpClient, RegistryIdentity, RegistryUploadApi};
pub use upload::{LayerPusher, LayerUploadSession, StatusTracker};
