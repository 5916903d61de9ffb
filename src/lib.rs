#![deny(warnings, rust_2024_compatibility)]
// Specific pedantic lints enforced (not blanket allow):
#![deny(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned,
    clippy::inconsistent_struct_constructor
)]
// Noisy pedantic lints suppressed with justification:
#![allow(
    clippy::missing_errors_doc,       // Error variants are documented on the enums
    clippy::module_name_repetitions,  // e.g. ClientError in sender::client
    clippy::must_use_candidate,       // Annotated selectively on critical APIs
    clippy::doc_markdown              // Internal API
)]

pub mod app;
pub mod domain;
pub mod sender;

// Re-export main types for easy access
pub use app::Config;
pub use sender::{ClientConfig, ClientError, LokiClient, PushContext, PushOutcome};
