//! Candidate builder - from resolved closure to upload candidates
//!
//! Combines the [`DependencyResolver`](crate::resolver::DependencyResolver)
//! output with the edit overlay to produce one fully populated
//! [`UploadCandidate`] per item. Overlay entries are re-applied to the
//! fresh instances here, before status resolution runs, which is what makes
//! manual overrides survive plan regeneration.

use std::collections::BTreeMap;

use tracing::debug;

use depotsync_core::domain::candidate::UploadCandidate;
use depotsync_core::domain::ids::StableId;
use depotsync_core::domain::overlay::EditOverlay;

use crate::resolver::ResolvedItem;

/// Builds upload candidates from a resolved dependency closure
pub struct CandidateBuilder;

impl CandidateBuilder {
    /// Produces one candidate per resolved item, overlay applied
    ///
    /// The result is ordered deterministically by (name, id) so repeated
    /// regenerations with identical inputs yield structurally identical
    /// plans.
    pub fn build(
        resolved: BTreeMap<StableId, ResolvedItem>,
        overlay: &EditOverlay,
    ) -> Vec<UploadCandidate> {
        let mut candidates: Vec<UploadCandidate> = resolved
            .into_values()
            .map(|item| {
                let mut candidate = UploadCandidate::new(item.id, item.info.name, item.info.kind);
                candidate.set_tags(item.info.tags);
                candidate.set_files(item.files);
                candidate.set_dependencies(item.dependencies);
                candidate.set_is_dependency(item.is_dependency);

                // Manual overrides are keyed by stable identity, never by
                // candidate reference, so they apply cleanly to the fresh
                // instance.
                overlay.apply_to(&mut candidate);

                candidate
            })
            .collect();

        candidates.sort_by(|a, b| {
            a.name()
                .cmp(b.name())
                .then_with(|| a.id().cmp(b.id()))
        });

        debug!(candidates = candidates.len(), "Built upload candidates");
        candidates
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use depotsync_core::domain::overlay::FieldEdit;
    use depotsync_core::ports::content_graph::ItemInfo;

    use super::*;

    fn resolved_item(name: &str, is_dependency: bool) -> (StableId, ResolvedItem) {
        let id = StableId::new();
        (
            id,
            ResolvedItem {
                id,
                info: ItemInfo {
                    name: name.to_string(),
                    kind: "package".to_string(),
                    tags: vec!["env".to_string()],
                    root_path: PathBuf::from(format!("/project/{name}")),
                },
                files: Vec::new(),
                dependencies: Vec::new(),
                is_dependency,
            },
        )
    }

    #[test]
    fn test_build_populates_candidate_from_graph() {
        let (id, item) = resolved_item("Road Tiles", false);
        let resolved: BTreeMap<_, _> = [(id, item)].into_iter().collect();

        let candidates = CandidateBuilder::build(resolved, &EditOverlay::new());

        assert_eq!(candidates.len(), 1);
        let c = &candidates[0];
        assert_eq!(c.id(), &id);
        assert_eq!(c.name(), "Road Tiles");
        assert_eq!(c.kind(), "package");
        assert_eq!(c.tags(), ["env".to_string()]);
        assert!(!c.is_dependency());
    }

    #[test]
    fn test_build_applies_overlay() {
        let (id, item) = resolved_item("Road Tiles", true);
        let resolved: BTreeMap<_, _> = [(id, item)].into_iter().collect();

        let mut overlay = EditOverlay::new();
        overlay.set_ignored(id, true);
        overlay.set_edit(id, FieldEdit::name("Renamed Tiles").unwrap());

        let candidates = CandidateBuilder::build(resolved, &overlay);

        let c = &candidates[0];
        assert_eq!(c.name(), "Renamed Tiles");
        assert!(c.is_ignored());
        assert!(c.is_dependency());
    }

    #[test]
    fn test_build_orders_by_name_then_id() {
        let (id_b, item_b) = resolved_item("Bravo", false);
        let (id_a, item_a) = resolved_item("Alpha", false);
        let resolved: BTreeMap<_, _> = [(id_b, item_b), (id_a, item_a)].into_iter().collect();

        let candidates = CandidateBuilder::build(resolved, &EditOverlay::new());

        assert_eq!(candidates[0].id(), &id_a);
        assert_eq!(candidates[1].id(), &id_b);
    }
}
