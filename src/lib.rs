//! Alpha: a chat client for the Gemini `generateContent` API.
//!
//! # Architecture
//!
//! - `conversation` - ordered history plus the pending document slot
//! - `request` - wire payloads and the history → payload mapping
//! - `dispatch` - the send cycle and its in-flight flag
//! - `transport` - proxy and direct HTTP transports
//! - `document` - PDF text extraction
//! - `session` - the surface a view talks to
//! - `ui` / `views` - the Dioxus front end (behind the `web`, `desktop` or `mobile` features)
//!
//! # Usage
//!
//! ```rust,no_run
//! use alpha_chat::{ChatSession, PdfExtractor, config::Config};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let transport = Config::from_env()?.build_transport();
//! let mut session = ChatSession::new(transport, Arc::new(PdfExtractor::new()));
//! session.send_message("Hello!").await;
//! for message in session.current_sequence() {
//!     println!("{}: {}", message.origin().as_str(), message.content());
//! }
//! # Ok(())
//! # }
//! ```
pub mod config;
pub mod conversation;
pub mod dispatch;
pub mod document;
pub mod render;
pub mod request;
pub mod session;
pub mod transport;
pub mod types;

#[cfg(feature = "dioxus")]
pub mod ui;
#[cfg(feature = "dioxus")]
pub mod views;

pub use conversation::ConversationStore;
pub use dispatch::{DispatchController, PendingReply};
pub use document::{DocumentExtractor, ExtractionError, PdfExtractor};
pub use request::{GenerateRequest, GenerateResponse, GenerationConfig, build_request};
pub use session::ChatSession;
pub use transport::{Transport, TransportError};
pub use types::{Message, Origin};
