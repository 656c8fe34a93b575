//! Registry module for remote upload interactions
//!
//! This module provides the identity value scoping an upload to a registry
//! account and repository, the capability interface over the remote
//! chunked-upload API, and the production HTTP adapter.

pub mod api;
pub mod client;
pub mod identity;
pub mod types;

pub use api::RegistryUploadApi;
pub use client::RegistryHttpClient;
pub use identity::RegistryIdentity;
pub use types::{CompleteLayerUploadOutput, InitiateLayerUploadOutput, LayerDescriptor};
