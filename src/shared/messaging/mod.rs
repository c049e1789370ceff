//! Messaging Module
//!
//! This module contains the data structures for direct messaging:
//!
//! - `ChatMessage` - A persisted message between two users
//! - `Conversation` - One owner's summary of a conversation with a peer
//! - `InboundFrame` / `OutboundFrame` - The WebSocket wire protocol
//!
//! # Usage
//!
//! ```rust
//! use tapspot::shared::messaging::{validate_outgoing, InboundFrame};
//!
//! let frame = InboundFrame::decode(r#"{"type":"read","receiver_id":2}"#).unwrap();
//! assert!(validate_outgoing(1, 2, "hi").is_ok());
//! ```

pub mod conversation;
pub mod message;
pub mod wire;

pub use conversation::{
    Conversation, ConversationPair, ConversationSummary, GetConversationResponse,
    ListConversationsResponse, MarkReadResponse,
};
pub use message::{
    validate_outgoing, ChatMessage, ListMessagesResponse, MessageView, SendMessageRequest,
    SendMessageResponse, UnreadCountResponse, UserId, MAX_CONTENT_CHARS,
};
pub use wire::{ChatFrame, InboundFrame, OutboundFrame};
