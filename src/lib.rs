//! Relays editor-assistant model output to browsers as Server-Sent Events.
//!
//! The model answers with a single JSON document, `{"contents":[...]}`, whose
//! elements are either assistant prose (`{"message": ...}`) or Quill-style
//! delta operations (`insert`/`delete`/`retain`). The document arrives in
//! arbitrary text chunks; [`services::fragment_parser`] picks out elements as
//! soon as they are complete, [`services::stream_reconciler`] classifies them
//! and [`ui::sse_transport`] writes them to the client.
//!
//! ```
//! use editor_assistant_relay::enums::sse_event::SseEvent;
//! use editor_assistant_relay::services::stream_reconciler::StreamReconciler;
//!
//! let mut reconciler = StreamReconciler::new(Vec::<SseEvent>::new());
//! reconciler.process("", r#"{"contents":[{"message":"Hi"},"#);
//! reconciler.process(r#"{"contents":[{"message":"Hi"},"#, r#"{"retain":2}]}"#);
//! assert_eq!(reconciler.sink().len(), 2);
//! ```

pub mod config;
pub mod enums;
pub mod errors;
pub mod helpers;
pub mod logger;
pub mod prompts;
pub mod services;
pub mod structs;
pub mod traits;
pub mod ui;
pub mod workers;
