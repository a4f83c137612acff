use crate::conversation::ConversationStore;
use crate::dispatch::{DispatchController, PendingReply};
use crate::document::{DocumentExtractor, ExtractionError};
use crate::request::GenerateResponse;
use crate::transport::{Transport, TransportResult};
use crate::types::Message;
use std::sync::Arc;
use tracing::info;

/// Recorded in the history once a document has been read.
pub const UPLOAD_NOTICE: &str = "1 file uploaded";

/// Everything a chat view needs: the history, the in-flight flag, and the two user actions.
pub struct ChatSession {
    store: ConversationStore,
    dispatch: DispatchController,
    extractor: Arc<dyn DocumentExtractor>,
}

impl ChatSession {
    pub fn new(transport: Arc<dyn Transport>, extractor: Arc<dyn DocumentExtractor>) -> Self {
        Self::with_controller(DispatchController::new(transport), extractor)
    }

    pub fn with_controller(
        dispatch: DispatchController,
        extractor: Arc<dyn DocumentExtractor>,
    ) -> Self {
        Self {
            store: ConversationStore::new(),
            dispatch,
            extractor,
        }
    }

    pub fn current_sequence(&self) -> &[Message] {
        self.store.current_sequence()
    }

    pub fn in_flight(&self) -> bool {
        self.dispatch.in_flight()
    }

    pub fn has_pending_document(&self) -> bool {
        self.store.has_pending_attachment()
    }

    pub fn extractor(&self) -> Arc<dyn DocumentExtractor> {
        Arc::clone(&self.extractor)
    }

    pub async fn send_message(&mut self, typed: &str) -> bool {
        self.dispatch.send_message(&mut self.store, typed).await
    }

    /// Reads the document and queues its text for the next send. On failure the history is
    /// left untouched.
    pub async fn on_file_selected(&mut self, bytes: &[u8]) -> Result<(), ExtractionError> {
        let text = self.extractor.extract_text(bytes).await?;
        self.attach_document(text);
        Ok(())
    }

    pub fn attach_document(&mut self, text: String) {
        info!(chars = text.len(), "document ready for next message");
        self.store.set_pending_attachment(text);
        self.store.append(Message::user(UPLOAD_NOTICE));
    }

    pub fn begin_send(&mut self, typed: &str) -> Option<PendingReply> {
        self.dispatch.begin(&mut self.store, typed)
    }

    pub fn finish_send(&mut self, outcome: TransportResult<GenerateResponse>) {
        self.dispatch.complete(&mut self.store, outcome);
    }

    /// Starts over. Ignored while a reply is outstanding.
    pub fn new_chat(&mut self) {
        if !self.in_flight() {
            self.store.clear();
        }
    }
}
