//! Run context passed into nodes for streaming-aware execution.
//!
//! Holds the optional stream sender plus the selected stream modes.

use std::collections::HashSet;

use tokio::sync::mpsc;

use crate::stream::{StreamEvent, StreamMode};

#[derive(Clone, Debug, Default)]
pub struct RunContext {
    /// Optional sender for streaming events.
    pub stream_tx: Option<mpsc::Sender<StreamEvent>>,
    /// Enabled stream modes (Values, Updates).
    pub stream_mode: HashSet<StreamMode>,
}

impl RunContext {
    /// True when events of `mode` should be sent.
    pub fn wants(&self, mode: StreamMode) -> bool {
        self.stream_tx.is_some() && self.stream_mode.contains(&mode)
    }
}
