//! Loki push client: connectivity check and payload delivery.

pub mod client;
pub mod context;
pub mod response;

pub use client::{
    ClientConfig, ClientError, ErrorKind, LABEL_PATH, LokiClient, MAX_ERROR_BODY_BYTES, PUSH_PATH,
    PushOutcome,
};
pub use context::PushContext;
