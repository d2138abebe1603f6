//! Centralized user-facing messages.
//!
//! Every line the CLI prints goes through [`Message`] so wording lives in one
//! place (`display.rs`) and output routing lives in the `msg_*!` macros.

pub mod display;
pub mod macros;
pub mod types;

pub use types::Message;
