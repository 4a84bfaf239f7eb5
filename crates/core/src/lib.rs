//! # calagent Core
//!
//! Domain types, traits, and error definitions for the calagent scheduling
//! assistant. This crate has **zero framework dependencies**: it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every collaborator of the reasoning loop is a trait here. Implementations
//! live in their respective crates. This enables:
//! - Swapping the model backend or session store via configuration
//! - Easy testing with scripted providers and recording tools
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod message;
pub mod provider;
pub mod schema;
pub mod session;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use message::{ConversationState, Message, Role, SessionId};
pub use provider::{Provider, ProviderRequest, ProviderResponse};
pub use schema::{FieldKind, FieldSpec, InputSchema};
pub use session::{SessionHandle, SessionStore};
pub use tool::{Tool, ToolDescriptor, ToolRegistry};
