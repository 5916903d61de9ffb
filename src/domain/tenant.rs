use reqwest::header::{HeaderValue, InvalidHeaderValue};
use std::fmt;

/// Header Loki reads the tenant from.
pub const ORG_ID_HEADER: &str = "X-Scope-OrgID";

/// Tenant (org ID) a client's requests are scoped to.
///
/// An empty identifier means "no tenant": the header is then omitted from
/// requests rather than sent with an empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantId(Option<String>);

impl TenantId {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.is_empty() {
            Self(None)
        } else {
            Self(Some(raw))
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    /// Value for the `X-Scope-OrgID` header, `None` when no tenant is set.
    pub fn header_value(&self) -> Result<Option<HeaderValue>, InvalidHeaderValue> {
        self.0.as_deref().map(HeaderValue::from_str).transpose()
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().unwrap_or("<none>"))
    }
}
