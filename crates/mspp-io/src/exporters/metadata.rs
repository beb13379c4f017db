//! Provenance attached to exported files.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a solution came from and when it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// Network file the instance was read from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Instance label within the network file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    pub created_at: DateTime<Utc>,
    pub mspp_version: String,
}

impl ExportMetadata {
    pub fn now() -> Self {
        Self {
            source: None,
            instance: None,
            created_at: Utc::now(),
            mspp_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>, instance: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self.instance = Some(instance.into());
        self
    }

    pub fn creation_timestamp(&self) -> String {
        self.created_at
            .to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
    }
}

impl Default for ExportMetadata {
    fn default() -> Self {
        Self::now()
    }
}
