//! Remote catalog port (driven/secondary port)
//!
//! This module defines the interface the engines use to ask the remote
//! content store about existence and freshness. The concrete transport
//! (HTTP API, SDK, offline fixture) lives in adapter crates.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because errors at port boundaries are
//!   adapter-specific and don't need domain-level classification. The
//!   status resolver maps them to per-candidate `Unknown` markers.
//! - Uses `#[async_trait]` for async trait methods; all calls may block
//!   on network I/O and are dispatched under a concurrency cap.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::{RemoteRef, StableId};

/// Latest-version answer from the remote store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteVersion {
    /// Latest version number of the item
    pub version: u64,
    /// Remote "last updated" timestamp of that version
    pub last_updated: DateTime<Utc>,
}

/// Port trait for remote existence and version lookups
///
/// Implementations handle transport, authentication, and retry; the
/// engines only see the three questions below.
#[async_trait::async_trait]
pub trait IRemoteCatalog: Send + Sync {
    /// Looks up the remote counterpart of a local item
    ///
    /// Resolution goes through the stable local-to-remote cross-reference;
    /// returns `None` when the item has never been uploaded.
    async fn find_counterpart(&self, id: &StableId) -> anyhow::Result<Option<RemoteRef>>;

    /// Confirms that a remote item still exists on the server
    ///
    /// A mapping can outlive its target (the item was deleted remotely);
    /// this check distinguishes the two.
    async fn item_exists(&self, remote: &RemoteRef) -> anyhow::Result<bool>;

    /// Fetches the latest version pointer for a remote item
    async fn latest_version(&self, remote: &RemoteRef) -> anyhow::Result<RemoteVersion>;
}
