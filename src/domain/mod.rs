//! Domain layer for remotelog.
//!
//! Contains the types shared between the client and its callers:
//! - `TenantId`: The optional Loki tenant (org ID) every request is scoped to
//! - `RemoteLogError`: Top-level error type for the shipping binary

pub mod error;
pub mod tenant;

pub use error::RemoteLogError;
pub use tenant::{ORG_ID_HEADER, TenantId};
