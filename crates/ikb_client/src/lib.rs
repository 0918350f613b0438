//! Knowledge-base chat client library (conversation controller, HTTP chat
//! service, renderer seam, config). Used by the `ikb-chat` terminal front end.

pub mod client;
pub mod config;
pub mod conversation;
pub mod messages;
pub mod render;

pub use client::{ChatService, HttpChatClient, ServiceFailure, DEFAULT_ENDPOINT};
pub use config::{
    default_config_path, Config, ConfigError, ServiceSection, SessionSection, DEFAULT_GREETING,
};
pub use conversation::{ConversationLog, Controller, Message, Sender, SubmitOutcome};
pub use messages::{ChatReply, ChatRequest};
pub use render::{Renderer, TerminalRenderer};
