//! Chunked layer upload session
//!
//! [`LayerUploadSession`] turns a sequence of `write` calls plus one `commit`
//! into the remote call sequence the registry's multi-step upload API
//! expects: one initiate negotiating an upload id and part size, one part
//! call per full negotiated chunk at strictly increasing contiguous offsets,
//! a final short part flushed at commit, and one complete call.
//!
//! A session is driven by a single logical caller issuing `write`/`commit`
//! strictly in order; concurrent calls on the same session are a
//! precondition violation and are not guarded against. Parts are sent
//! sequentially because each range depends on the previously acknowledged
//! offset.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::{PushError, Result};
use crate::logging::Logger;
use crate::registry::{LayerDescriptor, RegistryIdentity, RegistryUploadApi};
use crate::upload::progress::{StatusTracker, TransferState, UploadStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Created,
    Initiated,
    Uploading,
    Committing,
    Completed,
    Failed,
}

pub struct LayerUploadSession {
    client: Arc<dyn RegistryUploadApi>,
    identity: RegistryIdentity,
    tracker: Arc<dyn StatusTracker>,
    ref_key: String,
    descriptor: LayerDescriptor,
    cancel: CancellationToken,
    output: Logger,

    // Assigned once at initiation, immutable afterwards.
    upload_id: String,
    part_size: usize,

    // Bytes acknowledged by successful part calls. Buffered remainder bytes
    // are not counted until their part call succeeds.
    bytes_written: u64,
    pending: Vec<u8>,
    state: SessionState,
}

impl std::fmt::Debug for LayerUploadSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerUploadSession")
            .field("ref_key", &self.ref_key)
            .field("descriptor", &self.descriptor)
            .field("upload_id", &self.upload_id)
            .field("part_size", &self.part_size)
            .field("bytes_written", &self.bytes_written)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl LayerUploadSession {
    /// Open an upload session. Performs the single initiate call; on failure
    /// the error is surfaced and no session is returned.
    pub async fn initiate(
        client: Arc<dyn RegistryUploadApi>,
        identity: RegistryIdentity,
        tracker: Arc<dyn StatusTracker>,
        ref_key: impl Into<String>,
        descriptor: LayerDescriptor,
        cancel: CancellationToken,
        output: Logger,
    ) -> Result<Self> {
        let mut session = LayerUploadSession {
            client,
            identity,
            tracker,
            ref_key: ref_key.into(),
            descriptor,
            cancel,
            output,
            upload_id: String::new(),
            part_size: 0,
            bytes_written: 0,
            pending: Vec::new(),
            state: SessionState::Created,
        };

        if session.cancel.is_cancelled() {
            return Err(PushError::Cancelled);
        }

        let negotiated = session
            .client
            .initiate_layer_upload(&session.identity)
            .await?;

        session.upload_id = negotiated.upload_id;
        // The negotiated size is authoritative; a degenerate response still
        // has to yield a usable chunk size.
        session.part_size = if negotiated.part_size > 0 {
            negotiated.part_size as usize
        } else {
            1
        };
        session.state = SessionState::Initiated;

        session.output.detail(&format!(
            "Upload session {} opened for {} (part size {})",
            session.upload_id,
            session.descriptor.digest,
            session.part_size
        ));
        session.report(TransferState::Uploading);

        Ok(session)
    }

    /// Append bytes to the blob, sending one part per full negotiated chunk.
    ///
    /// Returns the input length on success. Any remainder smaller than the
    /// part size stays buffered for the next write or for flush at commit.
    /// On error the session becomes unusable.
    pub async fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.ensure_usable()?;
        self.state = SessionState::Uploading;

        self.pending.extend_from_slice(buf);
        while self.pending.len() >= self.part_size {
            let part_len = self.part_size;
            if let Err(e) = self.send_part(part_len).await {
                self.fail();
                return Err(e);
            }
        }
        Ok(buf.len())
    }

    /// Finalize the upload: flush the buffered remainder as a final short
    /// part, then complete the session and validate the outcome.
    ///
    /// Two success paths: a normal complete whose returned digest matches
    /// `expected_digest`, and the content-already-present condition, which is
    /// success because the destination is content-addressed. The latter is
    /// honored even when cancellation has already fired; a commit the remote
    /// side confirmed as satisfied cannot be retroactively failed.
    pub async fn commit(&mut self, expected_size: i64, expected_digest: &str) -> Result<()> {
        self.ensure_usable()?;
        self.state = SessionState::Committing;

        if !self.pending.is_empty() {
            let tail_len = self.pending.len();
            if let Err(e) = self.send_part(tail_len).await {
                self.fail();
                return Err(e);
            }
        }

        let outcome = self
            .client
            .complete_layer_upload(&self.identity, &self.upload_id, self.bytes_written as i64)
            .await;

        match outcome {
            Ok(completed) => {
                if expected_size > 0 && expected_size as u64 != self.bytes_written {
                    self.fail();
                    return Err(PushError::Validation(format!(
                        "Committed {} bytes but expected {}",
                        self.bytes_written, expected_size
                    )));
                }
                if completed.digest != expected_digest {
                    self.fail();
                    return Err(PushError::DigestMismatch {
                        expected: expected_digest.to_string(),
                        actual: completed.digest,
                    });
                }
                self.complete();
                Ok(())
            }
            Err(PushError::LayerAlreadyExists) => {
                self.output.detail(&format!(
                    "Layer {} already present, treating commit as success",
                    self.descriptor.digest
                ));
                self.complete();
                Ok(())
            }
            Err(e) => {
                self.fail();
                Err(e)
            }
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Bytes acknowledged by the registry so far
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn upload_id(&self) -> &str {
        &self.upload_id
    }

    pub fn part_size(&self) -> usize {
        self.part_size
    }

    /// Send the first `len` buffered bytes as one part at the next
    /// contiguous offset. The buffer and byte count are only advanced once
    /// the registry acknowledged the part.
    async fn send_part(&mut self, len: usize) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(PushError::Cancelled);
        }

        let first_byte = self.bytes_written as i64;
        let last_byte = first_byte + len as i64 - 1;
        self.client
            .upload_layer_part(
                &self.identity,
                &self.upload_id,
                first_byte,
                last_byte,
                &self.pending[..len],
            )
            .await?;

        self.pending.drain(..len);
        self.bytes_written += len as u64;
        self.report(TransferState::Uploading);
        Ok(())
    }

    fn ensure_usable(&self) -> Result<()> {
        match self.state {
            SessionState::Completed => Err(PushError::SessionClosed(
                "upload already committed".to_string(),
            )),
            SessionState::Failed => Err(PushError::SessionClosed(
                "a previous operation failed".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn complete(&mut self) {
        self.state = SessionState::Completed;
        self.output.detail(&format!(
            "Upload session {} completed ({} written)",
            self.upload_id,
            self.output.format_size(self.bytes_written)
        ));
        self.report(TransferState::Completed);
    }

    fn fail(&mut self) {
        self.state = SessionState::Failed;
        self.report(TransferState::Failed);
    }

    fn report(&self, state: TransferState) {
        let total = self.descriptor.size.unwrap_or(0).max(0) as u64;
        self.tracker.set_status(
            &self.ref_key,
            UploadStatus {
                offset: self.bytes_written,
                total,
                state,
            },
        );
    }
}
