//! Depotsync Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `UploadCandidate`, `EditOverlay`, `TrackedItem`,
//!   `SyncCheckResult` and their supporting value types
//! - **Port definitions** - Traits for adapters: `IRemoteCatalog`,
//!   `IContentGraph`, `ITrackedStore`, `IDirtyObjects`
//! - **Configuration** - Typed config mapped from the YAML config file
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure business logic with no external
//! dependencies. Ports define trait interfaces that adapter crates implement.
//! The planning and checking engines (separate crates) orchestrate domain
//! entities through port interfaces.

pub mod config;
pub mod domain;
pub mod ports;
