//! Upload module for the chunked session state machine and progress tracking

pub mod progress;
pub mod pusher;
pub mod session;

pub use progress::{
    InMemoryStatusTracker, NoopStatusTracker, StatusTracker, TransferState, UploadStatus,
};
pub use pusher::LayerPusher;
pub use session::{LayerUploadSession, SessionState};
