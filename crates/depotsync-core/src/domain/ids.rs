//! Identity newtypes with validation
//!
//! This module provides strongly-typed wrappers for the two identity spaces
//! the engine joins on: the local, version-independent [`StableId`] and the
//! remote, version-addressed [`RemoteRef`].

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::DomainError;

// ============================================================================
// StableId
// ============================================================================

/// Stable identity of a local content item
///
/// Opaque and version-independent: it never changes for the lifetime of the
/// local item, regardless of renames, edits, or remote uploads. It is the
/// join key between overlay entries, cached plan state, and remote mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StableId(Uuid);

impl StableId {
    /// Create a new random StableId
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a StableId from an existing UUID
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID value
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Create a nil (all zeros) StableId
    #[must_use]
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for StableId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for StableId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StableId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| DomainError::InvalidId(format!("Invalid StableId: {e}")))
    }
}

impl From<Uuid> for StableId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

// ============================================================================
// RemoteRef
// ============================================================================

/// Reference to one specific version of a remote item
///
/// The remote content store addresses snapshots as
/// `(organization, project, item, version)`. A local item that has never
/// been uploaded has no `RemoteRef` (`Option<RemoteRef>` is `None`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RemoteRef {
    organization: String,
    project: String,
    item_id: String,
    version: u64,
}

impl RemoteRef {
    /// Create a new RemoteRef, validating all components are non-empty
    ///
    /// # Errors
    /// Returns `DomainError::InvalidRemoteRef` if any component is empty
    /// or contains the `/` separator used by the display form.
    pub fn new(
        organization: impl Into<String>,
        project: impl Into<String>,
        item_id: impl Into<String>,
        version: u64,
    ) -> Result<Self, DomainError> {
        let organization = organization.into();
        let project = project.into();
        let item_id = item_id.into();

        for (label, value) in [
            ("organization", &organization),
            ("project", &project),
            ("item", &item_id),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::InvalidRemoteRef(format!(
                    "{label} component cannot be empty"
                )));
            }
            if value.contains('/') {
                return Err(DomainError::InvalidRemoteRef(format!(
                    "{label} component cannot contain '/': {value}"
                )));
            }
        }

        Ok(Self {
            organization,
            project,
            item_id,
            version,
        })
    }

    /// Organization component
    #[must_use]
    pub fn organization(&self) -> &str {
        &self.organization
    }

    /// Project component
    #[must_use]
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Remote item identifier
    #[must_use]
    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    /// Version number of the addressed snapshot
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The same item at a different version
    #[must_use]
    pub fn at_version(&self, version: u64) -> Self {
        Self {
            version,
            ..self.clone()
        }
    }

    /// Returns true if both refs name the same item, ignoring version
    #[must_use]
    pub fn same_item(&self, other: &RemoteRef) -> bool {
        self.organization == other.organization
            && self.project == other.project
            && self.item_id == other.item_id
    }
}

impl Display for RemoteRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}@v{}",
            self.organization, self.project, self.item_id, self.version
        )
    }
}

impl FromStr for RemoteRef {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, version) = s.rsplit_once("@v").ok_or_else(|| {
            DomainError::InvalidRemoteRef(format!("Missing '@v' version suffix: {s}"))
        })?;
        let version: u64 = version.parse().map_err(|e| {
            DomainError::InvalidRemoteRef(format!("Invalid version number in '{s}': {e}"))
        })?;

        let parts: Vec<&str> = path.split('/').collect();
        if parts.len() != 3 {
            return Err(DomainError::InvalidRemoteRef(format!(
                "Expected org/project/item@vN, got: {s}"
            )));
        }

        Self::new(parts[0], parts[1], parts[2], version)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod stable_id_tests {
        use super::*;

        #[test]
        fn test_new_creates_unique_ids() {
            let id1 = StableId::new();
            let id2 = StableId::new();
            assert_ne!(id1, id2);
        }

        #[test]
        fn test_from_str() {
            let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
            let id: StableId = uuid_str.parse().unwrap();
            assert_eq!(id.to_string(), uuid_str);
        }

        #[test]
        fn test_from_str_invalid() {
            let result: Result<StableId, _> = "not-a-uuid".parse();
            assert!(result.is_err());
        }

        #[test]
        fn test_nil() {
            let id = StableId::nil();
            assert_eq!(id.to_string(), "00000000-0000-0000-0000-000000000000");
        }

        #[test]
        fn test_serde_roundtrip() {
            let id = StableId::new();
            let json = serde_json::to_string(&id).unwrap();
            let parsed: StableId = serde_json::from_str(&json).unwrap();
            assert_eq!(id, parsed);
        }
    }

    mod remote_ref_tests {
        use super::*;

        fn sample() -> RemoteRef {
            RemoteRef::new("acme", "city-builder", "pkg-road-tiles", 3).unwrap()
        }

        #[test]
        fn test_new_valid() {
            let r = sample();
            assert_eq!(r.organization(), "acme");
            assert_eq!(r.project(), "city-builder");
            assert_eq!(r.item_id(), "pkg-road-tiles");
            assert_eq!(r.version(), 3);
        }

        #[test]
        fn test_empty_component_fails() {
            assert!(RemoteRef::new("", "p", "i", 1).is_err());
            assert!(RemoteRef::new("o", " ", "i", 1).is_err());
            assert!(RemoteRef::new("o", "p", "", 1).is_err());
        }

        #[test]
        fn test_slash_in_component_fails() {
            assert!(RemoteRef::new("o/rg", "p", "i", 1).is_err());
        }

        #[test]
        fn test_display() {
            assert_eq!(sample().to_string(), "acme/city-builder/pkg-road-tiles@v3");
        }

        #[test]
        fn test_from_str_roundtrip() {
            let r = sample();
            let parsed: RemoteRef = r.to_string().parse().unwrap();
            assert_eq!(r, parsed);
        }

        #[test]
        fn test_from_str_invalid() {
            assert!("acme/city-builder/pkg".parse::<RemoteRef>().is_err());
            assert!("acme/pkg@v3".parse::<RemoteRef>().is_err());
            assert!("acme/city/pkg@vx".parse::<RemoteRef>().is_err());
        }

        #[test]
        fn test_at_version() {
            let r = sample().at_version(7);
            assert_eq!(r.version(), 7);
            assert!(r.same_item(&sample()));
        }

        #[test]
        fn test_same_item_ignores_version() {
            let a = sample();
            let b = sample().at_version(99);
            assert!(a.same_item(&b));

            let other = RemoteRef::new("acme", "city-builder", "pkg-other", 3).unwrap();
            assert!(!a.same_item(&other));
        }

        #[test]
        fn test_serde_roundtrip() {
            let r = sample();
            let json = serde_json::to_string(&r).unwrap();
            let parsed: RemoteRef = serde_json::from_str(&json).unwrap();
            assert_eq!(r, parsed);
        }
    }
}
