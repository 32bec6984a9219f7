//! Dependency resolver - memoized, cycle-safe closure over the item graph
//!
//! Given a root selection and a dependency mode, computes one
//! [`ResolvedItem`] per item that will appear in the plan, with its direct
//! dependency edges and fully materialized file list.
//!
//! ## Modes
//!
//! - **Embedded**: a dependency's files are inlined directly into the
//!   dependent's file list; the dependency gets no item of its own unless
//!   it is also part of the selection.
//! - **Separate**: one item per distinct dependency, shared across all
//!   dependents that reference it.
//!
//! ## Cycle safety
//!
//! The closure is an arena keyed by [`StableId`]. Before recursing into an
//! identity, its slot is set to an explicit in-progress sentinel; a
//! dependency that cycles back resolves to the sentinel and is skipped,
//! never infinitely recursed. Cycle detection is therefore an O(1) map
//! lookup instead of pointer chasing.
//!
//! Resolution is synchronous and single-threaded: it reads only the local
//! content graph and makes no network calls, so the result is a pure
//! function of (selection, ignored set, auxiliary flags, mode).

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;

use depotsync_core::config::DependencyMode;
use depotsync_core::domain::candidate::LocalFile;
use depotsync_core::domain::ids::StableId;
use depotsync_core::ports::content_graph::{IContentGraph, ItemInfo};

use crate::PlanError;

// ============================================================================
// ResolvedItem
// ============================================================================

/// One item of the resolved dependency closure
#[derive(Debug, Clone)]
pub struct ResolvedItem {
    /// Stable identity of the item
    pub id: StableId,
    /// Local attributes from the content graph
    pub info: ItemInfo,
    /// Materialized file list (own files plus any inlined content)
    pub files: Vec<LocalFile>,
    /// Direct dependency edges to other items of the closure
    pub dependencies: Vec<StableId>,
    /// True when the item was reached only transitively
    pub is_dependency: bool,
}

/// Per-regeneration inputs beyond the selection itself
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Identities with the manual ignore flag set
    pub ignored: BTreeSet<StableId>,
    /// Identities with the "include auxiliary files" flag set
    pub include_auxiliary: BTreeSet<StableId>,
    /// Include auxiliary files for every item regardless of per-item flags
    pub include_auxiliary_default: bool,
}

impl ResolveOptions {
    fn include_aux(&self, id: &StableId) -> bool {
        self.include_auxiliary_default || self.include_auxiliary.contains(id)
    }
}

// ============================================================================
// Memoization arena
// ============================================================================

/// Arena slot for the memoized closure
///
/// `InProgress` is the cycle sentinel: it is inserted before recursing into
/// an identity and replaced once the item is fully resolved.
enum Slot {
    InProgress,
    Done,
}

// ============================================================================
// DependencyResolver
// ============================================================================

/// Computes the dependency closure for one plan regeneration
pub struct DependencyResolver<'a> {
    graph: &'a dyn IContentGraph,
}

impl<'a> DependencyResolver<'a> {
    /// Creates a resolver over the given content graph
    pub fn new(graph: &'a dyn IContentGraph) -> Self {
        Self { graph }
    }

    /// Resolves the closure for a selection
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Graph`] when the content graph fails for any
    /// identity the closure needs (structural error, hard failure).
    pub fn resolve(
        &self,
        selection: &[StableId],
        options: &ResolveOptions,
        mode: DependencyMode,
    ) -> Result<BTreeMap<StableId, ResolvedItem>, PlanError> {
        let selected: BTreeSet<StableId> = selection.iter().copied().collect();

        debug!(
            selection = selection.len(),
            ignored = options.ignored.len(),
            ?mode,
            "Resolving dependency closure"
        );

        match mode {
            DependencyMode::Separate => self.resolve_separate(&selected, options),
            DependencyMode::Embedded => self.resolve_embedded(&selected, options),
        }
    }

    // ========================================================================
    // Separate mode
    // ========================================================================

    /// One resolved item per distinct identity in the closure
    fn resolve_separate(
        &self,
        selected: &BTreeSet<StableId>,
        options: &ResolveOptions,
    ) -> Result<BTreeMap<StableId, ResolvedItem>, PlanError> {
        let mut memo: HashMap<StableId, Slot> = HashMap::new();
        let mut resolved: BTreeMap<StableId, ResolvedItem> = BTreeMap::new();

        for id in selected {
            self.visit(*id, selected, options, &mut memo, &mut resolved)?;
        }

        Ok(resolved)
    }

    /// Depth-first visit with the in-progress sentinel
    fn visit(
        &self,
        id: StableId,
        selected: &BTreeSet<StableId>,
        options: &ResolveOptions,
        memo: &mut HashMap<StableId, Slot>,
        resolved: &mut BTreeMap<StableId, ResolvedItem>,
    ) -> Result<(), PlanError> {
        if memo.contains_key(&id) {
            // Either fully resolved or a cycle back-edge; both are skipped.
            return Ok(());
        }
        memo.insert(id, Slot::InProgress);

        let info = self.item_info(&id)?;
        let dependencies = self.direct_dependencies(&id, false)?;

        for dep in &dependencies {
            self.visit(*dep, selected, options, memo, resolved)?;
        }

        let mut files = self.files(&id, options.include_aux(&id))?;

        // Embedded-only children (edges that exist only in inline mode) never
        // become standalone items; their content rides along with the owner.
        // Ignored children are filtered out here.
        let inline_edges = self.direct_dependencies(&id, true)?;
        let dependency_set: BTreeSet<StableId> = dependencies.iter().copied().collect();
        for child in inline_edges {
            if dependency_set.contains(&child)
                || selected.contains(&child)
                || options.ignored.contains(&child)
            {
                continue;
            }
            self.inline_files(child, selected, options, &mut files, &mut HashMap::new())?;
        }

        let is_dependency = !selected.contains(&id);
        resolved.insert(
            id,
            ResolvedItem {
                id,
                info,
                files,
                dependencies,
                is_dependency,
            },
        );
        memo.insert(id, Slot::Done);

        Ok(())
    }

    // ========================================================================
    // Embedded mode
    // ========================================================================

    /// Only selected items become resolved items; all transitive dependency
    /// content is inlined into their file lists
    fn resolve_embedded(
        &self,
        selected: &BTreeSet<StableId>,
        options: &ResolveOptions,
    ) -> Result<BTreeMap<StableId, ResolvedItem>, PlanError> {
        let mut resolved: BTreeMap<StableId, ResolvedItem> = BTreeMap::new();

        for id in selected {
            let info = self.item_info(id)?;
            let mut files = self.files(id, options.include_aux(id))?;
            let mut dependencies: Vec<StableId> = Vec::new();

            let mut memo: HashMap<StableId, Slot> = HashMap::new();
            memo.insert(*id, Slot::InProgress);

            for child in self.direct_dependencies(id, true)? {
                if selected.contains(&child) {
                    // The dependency has its own item; keep the edge and
                    // do not inline its content.
                    if !dependencies.contains(&child) {
                        dependencies.push(child);
                    }
                    continue;
                }
                if options.ignored.contains(&child) {
                    continue;
                }
                self.inline_files(child, selected, options, &mut files, &mut memo)?;
            }

            resolved.insert(
                *id,
                ResolvedItem {
                    id: *id,
                    info,
                    files,
                    dependencies,
                    is_dependency: false,
                },
            );
        }

        Ok(resolved)
    }

    /// Recursively appends an item's files (and its transitive non-selected
    /// dependencies' files) to `files`
    ///
    /// Shares the sentinel arena discipline with `visit`: the identity is
    /// marked in-progress before recursing, so inline cycles terminate.
    fn inline_files(
        &self,
        id: StableId,
        selected: &BTreeSet<StableId>,
        options: &ResolveOptions,
        files: &mut Vec<LocalFile>,
        memo: &mut HashMap<StableId, Slot>,
    ) -> Result<(), PlanError> {
        if memo.contains_key(&id) {
            return Ok(());
        }
        memo.insert(id, Slot::InProgress);

        files.extend(self.files(&id, options.include_aux(&id))?);

        for child in self.direct_dependencies(&id, true)? {
            if selected.contains(&child) || options.ignored.contains(&child) {
                continue;
            }
            self.inline_files(child, selected, options, files, memo)?;
        }

        memo.insert(id, Slot::Done);
        Ok(())
    }

    // ========================================================================
    // Graph access with structural-error mapping
    // ========================================================================

    fn item_info(&self, id: &StableId) -> Result<ItemInfo, PlanError> {
        self.graph
            .item_info(id)
            .map_err(|source| PlanError::Graph { id: *id, source })
    }

    fn direct_dependencies(&self, id: &StableId, inline: bool) -> Result<Vec<StableId>, PlanError> {
        self.graph
            .direct_dependencies(id, inline)
            .map_err(|source| PlanError::Graph { id: *id, source })
    }

    fn files(&self, id: &StableId, include_auxiliary: bool) -> Result<Vec<LocalFile>, PlanError> {
        self.graph
            .files(id, include_auxiliary)
            .map_err(|source| PlanError::Graph { id: *id, source })
    }
}

// ============================================================================
// Tests
// ============================================================================
