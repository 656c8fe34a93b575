//! Capability interface over the remote chunked-upload API
//!
//! The upload session is written against this trait so any conforming
//! implementation can be supplied: the production HTTP adapter or a scripted
//! substitute in tests. Retry and timeout policy, if any, lives beneath this
//! seam.

use async_trait::async_trait;

use super::identity::RegistryIdentity;
use super::types::{CompleteLayerUploadOutput, InitiateLayerUploadOutput};
use crate::error::Result;

#[async_trait]
pub trait RegistryUploadApi: Send + Sync {
    /// Open a new upload session, negotiating an upload id and part size.
    async fn initiate_layer_upload(
        &self,
        identity: &RegistryIdentity,
    ) -> Result<InitiateLayerUploadOutput>;

    /// Upload one part of the blob.
    ///
    /// `first_byte` and `last_byte` are inclusive, zero-based offsets into
    /// the logical blob; `data` length is `last_byte - first_byte + 1`.
    /// Ranges must be contiguous and strictly increasing across calls.
    async fn upload_layer_part(
        &self,
        identity: &RegistryIdentity,
        upload_id: &str,
        first_byte: i64,
        last_byte: i64,
        data: &[u8],
    ) -> Result<()>;

    /// Finalize the upload after all parts were acknowledged.
    ///
    /// Returns the digest the registry computed. Fails with
    /// [`crate::error::PushError::LayerAlreadyExists`] when content under
    /// this digest is already stored.
    async fn complete_layer_upload(
        &self,
        identity: &RegistryIdentity,
        upload_id: &str,
        total_bytes: i64,
    ) -> Result<CompleteLayerUploadOutput>;

    /// Check whether a layer with the given digest is already stored.
    async fn check_layer_availability(
        &self,
        identity: &RegistryIdentity,
        digest: &str,
    ) -> Result<bool>;

    /// Resolve a pre-signed download URL for a stored layer. Used by the
    /// pull path, not by the upload session.
    async fn layer_download_url(
        &self,
        identity: &RegistryIdentity,
        digest: &str,
    ) -> Result<String>;
}
