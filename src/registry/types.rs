//! Value types crossing the upload capability interface

/// Descriptor of the blob being pushed: its expected content digest and,
/// when known up front, its size in bytes.
#[derive(Debug, Clone)]
pub struct LayerDescriptor {
    /// Algorithm-tagged digest string, e.g. `sha256:<hex>`. Treated as an
    /// opaque comparable value.
    pub digest: String,
    /// Total size in bytes; may be unknown until commit.
    pub size: Option<i64>,
}

impl LayerDescriptor {
    pub fn new(digest: impl Into<String>, size: Option<i64>) -> Self {
        LayerDescriptor {
            digest: digest.into(),
            size,
        }
    }
}

/// Result of a successful initiate call
#[derive(Debug, Clone)]
pub struct InitiateLayerUploadOutput {
    /// Identifier scoping all subsequent part and complete calls
    pub upload_id: String,
    /// Negotiated part size in bytes; authoritative for chunking
    pub part_size: i64,
}

/// Result of a successful complete call
#[derive(Debug, Clone)]
pub struct CompleteLayerUploadOutput {
    /// Digest the registry computed over the assembled blob
    pub digest: String,
}
