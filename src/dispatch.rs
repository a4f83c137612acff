//! The send cycle: Idle → Sending → Idle.
//!
//! A cycle is split around its single suspension point so reactive views can keep the
//! conversation in a signal:
//!
//! - [`DispatchController::begin`] checks there is something to send, echoes the user message,
//!   consumes the pending document and builds the payload.
//! - [`PendingReply::resolve`] performs the one transport call.
//! - [`DispatchController::complete`] turns the outcome into an assistant message.
//!
//! [`DispatchController::send_message`] runs all three for callers that own the store.

use crate::conversation::ConversationStore;
use crate::request::{GenerateRequest, GenerateResponse, GenerationConfig, build_request};
use crate::transport::{Transport, TransportResult};
use crate::types::Message;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Recorded in place of the typed text when only a document is sent.
pub const ATTACHMENT_PLACEHOLDER: &str = "Uploaded PDF content.";
/// Used when a successful response carries no candidate text.
pub const FALLBACK_REPLY: &str = "Sorry, I didn't get that.";
pub const ERROR_PREFIX: &str = "Error: Could not get a response.";

pub fn error_reply(reason: &str) -> String {
    if reason.is_empty() {
        ERROR_PREFIX.to_string()
    } else {
        format!("{ERROR_PREFIX} {reason}")
    }
}

pub struct DispatchController {
    transport: Arc<dyn Transport>,
    generation_config: GenerationConfig,
    in_flight: bool,
}

/// A built request waiting for its single transport call.
pub struct PendingReply {
    request: GenerateRequest,
    transport: Arc<dyn Transport>,
}

impl PendingReply {
    pub fn request(&self) -> &GenerateRequest {
        &self.request
    }

    pub async fn resolve(self) -> TransportResult<GenerateResponse> {
        self.transport.send(&self.request).await
    }
}

impl DispatchController {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_generation_config(transport, GenerationConfig::default())
    }

    pub fn with_generation_config(
        transport: Arc<dyn Transport>,
        generation_config: GenerationConfig,
    ) -> Self {
        Self {
            transport,
            generation_config,
            in_flight: false,
        }
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Enters Sending. Returns `None`, touching nothing, when there is neither typed text nor a
    /// pending document.
    pub fn begin(&mut self, store: &mut ConversationStore, typed: &str) -> Option<PendingReply> {
        let trimmed = typed.trim();
        if trimmed.is_empty() && !store.has_pending_attachment() {
            return None;
        }

        let shown = if trimmed.is_empty() {
            ATTACHMENT_PLACEHOLDER
        } else {
            trimmed
        };
        store.append(Message::user(shown));
        let attachment = store.take_pending_attachment();
        self.in_flight = true;

        let request = build_request(
            store.current_sequence(),
            attachment.as_deref(),
            self.generation_config,
        );
        debug!(
            turns = request.contents.len(),
            with_attachment = attachment.is_some(),
            "built generation request"
        );

        Some(PendingReply {
            request,
            transport: Arc::clone(&self.transport),
        })
    }

    /// Back to Idle. Failures become an assistant message; nothing is re-raised.
    pub fn complete(
        &mut self,
        store: &mut ConversationStore,
        outcome: TransportResult<GenerateResponse>,
    ) {
        let reply = match outcome {
            Ok(response) => match response.best_candidate_text() {
                Some(text) => text.to_string(),
                None => {
                    info!("response had no candidate text, using fallback reply");
                    FALLBACK_REPLY.to_string()
                }
            },
            Err(err) => {
                warn!(error = %err, "generation request failed");
                error_reply(&err.to_string())
            }
        };

        store.append(Message::assistant(reply));
        self.in_flight = false;
    }

    /// Runs a whole cycle. Returns `false` when there was nothing to send.
    pub async fn send_message(&mut self, store: &mut ConversationStore, typed: &str) -> bool {
        let Some(pending) = self.begin(store, typed) else {
            return false;
        };
        let outcome = pending.resolve().await;
        self.complete(store, outcome);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportError;
    use crate::types::Origin;
    use async_trait::async_trait;

    struct NeverCalled;

    #[async_trait]
    impl Transport for NeverCalled {
        async fn send(&self, _request: &GenerateRequest) -> TransportResult<GenerateResponse> {
            panic!("transport should not be reached");
        }
    }

    fn controller() -> DispatchController {
        DispatchController::new(Arc::new(NeverCalled))
    }

    #[test]
    fn blank_input_without_document_is_a_no_op() {
        let mut store = ConversationStore::new();
        let mut dispatch = controller();

        assert!(dispatch.begin(&mut store, "   \n").is_none());
        assert!(store.is_empty());
        assert!(!dispatch.in_flight());
    }

    #[test]
    fn begin_echoes_trimmed_text_and_goes_in_flight() {
        let mut store = ConversationStore::new();
        let mut dispatch = controller();

        let pending = dispatch.begin(&mut store, "  hello  ").expect("should send");
        assert!(dispatch.in_flight());
        assert_eq!(store.current_sequence()[0].content(), "hello");
        assert_eq!(pending.request().contents.len(), 1);
    }

    #[test]
    fn document_only_send_uses_placeholder() {
        let mut store = ConversationStore::new();
        store.set_pending_attachment("contract text");
        let mut dispatch = controller();

        let pending = dispatch.begin(&mut store, "").expect("should send");
        assert_eq!(store.current_sequence()[0].content(), ATTACHMENT_PLACEHOLDER);
        assert!(!store.has_pending_attachment());

        let last = pending.request().contents.last().expect("turns");
        assert_eq!(last.parts[0].text, "contract text");
    }

    #[test]
    fn complete_appends_fallback_for_empty_response() {
        let mut store = ConversationStore::new();
        let mut dispatch = controller();
        let _pending = dispatch.begin(&mut store, "hi");

        dispatch.complete(&mut store, Ok(GenerateResponse::default()));

        let reply = store.current_sequence().last().expect("reply");
        assert_eq!(reply.origin(), Origin::Assistant);
        assert_eq!(reply.content(), FALLBACK_REPLY);
        assert!(!dispatch.in_flight());
    }

    #[test]
    fn complete_turns_failure_into_message() {
        let mut store = ConversationStore::new();
        let mut dispatch = controller();
        let _pending = dispatch.begin(&mut store, "hi");

        dispatch.complete(
            &mut store,
            Err(TransportError::Status {
                status: 500,
                message: "API key not configured".into(),
            }),
        );

        assert_eq!(store.len(), 2);
        assert_eq!(
            store.current_sequence()[1].content(),
            "Error: Could not get a response. API key not configured"
        );
        assert!(!dispatch.in_flight());
    }

    #[test]
    fn error_reply_without_reason() {
        assert_eq!(error_reply(""), ERROR_PREFIX);
    }
}
