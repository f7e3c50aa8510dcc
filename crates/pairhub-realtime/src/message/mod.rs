//! Wire message definitions and shape validation.

pub mod types;
pub mod validator;

pub use types::{ChatMode, InboundMessage, OutboundMessage, SignalKind};
pub use validator::{MessageValidator, ValidationError};
