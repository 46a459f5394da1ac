use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::InvoiceError;

/// Identifier of a sales invoice (UUID).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SalesInvoiceId(Uuid);

impl SalesInvoiceId {
    /// Random (v4) identifier, for repositories that need one.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for SalesInvoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for SalesInvoiceId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for SalesInvoiceId {
    type Err = InvoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = Uuid::parse_str(s).map_err(|e| InvoiceError::InvalidId(format!("{s}: {e}")))?;
        Ok(Self(uuid))
    }
}
