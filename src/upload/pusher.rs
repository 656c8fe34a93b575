//! Push orchestration for a single layer blob
//!
//! Wraps the session state machine with the availability short-circuit: a
//! blob whose digest the registry already stores is never re-uploaded.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::digest::DigestUtils;
use crate::error::Result;
use crate::logging::Logger;
use crate::registry::{LayerDescriptor, RegistryIdentity, RegistryUploadApi};
use crate::upload::progress::StatusTracker;
use crate::upload::session::LayerUploadSession;

pub struct LayerPusher {
    client: Arc<dyn RegistryUploadApi>,
    identity: RegistryIdentity,
    tracker: Arc<dyn StatusTracker>,
    output: Logger,
}

impl LayerPusher {
    pub fn new(
        client: Arc<dyn RegistryUploadApi>,
        identity: RegistryIdentity,
        tracker: Arc<dyn StatusTracker>,
        output: Logger,
    ) -> Self {
        LayerPusher {
            client,
            identity,
            tracker,
            output,
        }
    }

    /// Push one blob through a fresh upload session.
    ///
    /// Returns `true` when the layer was already present and no upload ran.
    pub async fn push_blob(
        &self,
        ref_key: &str,
        descriptor: &LayerDescriptor,
        data: &[u8],
        cancel: CancellationToken,
    ) -> Result<bool> {
        if self
            .client
            .check_layer_availability(&self.identity, &descriptor.digest)
            .await?
        {
            self.output.info(&format!(
                "Layer {} already present, skipping upload",
                DigestUtils::format_digest_short(&descriptor.digest)
            ));
            return Ok(true);
        }

        self.output.step(&format!(
            "Pushing layer {} ({})",
            DigestUtils::format_digest_short(&descriptor.digest),
            self.output.format_size(data.len() as u64)
        ));

        let mut session = LayerUploadSession::initiate(
            self.client.clone(),
            self.identity.clone(),
            self.tracker.clone(),
            ref_key,
            descriptor.clone(),
            cancel,
            self.output.clone(),
        )
        .await?;

        session.write(data).await?;
        session.commit(data.len() as i64, &descriptor.digest).await?;

        self.output.success(&format!(
            "Layer {} pushed",
            DigestUtils::format_digest_short(&descriptor.digest)
        ));
        Ok(false)
    }
}
