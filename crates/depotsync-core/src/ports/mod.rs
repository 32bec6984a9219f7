//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! hexagonal architecture. Ports are interfaces that the domain core
//! depends on, but whose implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IRemoteCatalog`] - Remote existence and version lookups (async)
//! - [`IContentGraph`] - Local item graph: files and dependency edges
//! - [`ITrackedStore`] - Read-only tracked-import records
//! - [`IDirtyObjects`] - Best-effort dirty-object lookup for conflicts

pub mod content_graph;
pub mod dirty_objects;
pub mod remote_catalog;
pub mod tracked_store;

pub use content_graph::{IContentGraph, ItemInfo};
pub use dirty_objects::IDirtyObjects;
pub use remote_catalog::{IRemoteCatalog, RemoteVersion};
pub use tracked_store::ITrackedStore;
