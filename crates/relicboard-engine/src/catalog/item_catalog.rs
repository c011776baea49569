use std::collections::HashMap;

use crate::{ArtifactDefinition, SlateDefinition};

/// Name shown for ids that resolve to no definition.
pub const UNKNOWN_ITEM_NAME: &str = "N/A";

/// A resolved item definition.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::IsVariant)]
pub enum ItemDefinition<'a> {
    Artifact(&'a ArtifactDefinition),
    Slate(&'a SlateDefinition),
}

impl<'a> ItemDefinition<'a> {
    #[must_use]
    pub fn name(self) -> &'a str {
        match self {
            Self::Artifact(def) => &def.name,
            Self::Slate(def) => &def.name,
        }
    }
}

/// Immutable lookup table of every known artifact and slate.
///
/// Built once from the two definition collections. Within a collection, a later
/// record with a repeated id replaces the earlier one. An id defined as both an
/// artifact and a slate stays in both tables; [`ItemCatalog::lookup`] prefers the
/// artifact, while [`ItemCatalog::artifact`] and [`ItemCatalog::slate`] consult
/// only their own table.
///
/// Unknown ids are not an error anywhere: they resolve to `None` and are inert.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    artifacts: HashMap<String, ArtifactDefinition>,
    slates: HashMap<String, SlateDefinition>,
}

impl ItemCatalog {
    #[must_use]
    pub fn new<A, S>(artifacts: A, slates: S) -> Self
    where
        A: IntoIterator<Item = ArtifactDefinition>,
        S: IntoIterator<Item = SlateDefinition>,
    {
        let artifacts: HashMap<_, _> = artifacts
            .into_iter()
            .map(|def| (def.id.clone(), def))
            .collect();
        let slates: HashMap<_, _> = slates
            .into_iter()
            .map(|def| (def.id.clone(), def))
            .collect();

        for id in slates.keys().filter(|id| artifacts.contains_key(*id)) {
            tracing::warn!(item_id = %id, "item defined as both artifact and slate");
        }

        Self { artifacts, slates }
    }

    /// Creates a catalog with no definitions; every id is unknown.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn lookup(&self, id: &str) -> Option<ItemDefinition<'_>> {
        self.artifact(id)
            .map(ItemDefinition::Artifact)
            .or_else(|| self.slate(id).map(ItemDefinition::Slate))
    }

    #[must_use]
    pub fn artifact(&self, id: &str) -> Option<&ArtifactDefinition> {
        self.artifacts.get(id)
    }

    #[must_use]
    pub fn slate(&self, id: &str) -> Option<&SlateDefinition> {
        self.slates.get(id)
    }

    #[must_use]
    pub fn is_rotatable_slate(&self, id: &str) -> bool {
        self.slate(id).is_some_and(|slate| slate.rotatable)
    }

    /// Returns the display name for an id, or [`UNKNOWN_ITEM_NAME`].
    #[must_use]
    pub fn display_name(&self, id: &str) -> &str {
        self.lookup(id)
            .map_or(UNKNOWN_ITEM_NAME, ItemDefinition::name)
    }

    #[must_use]
    pub fn artifact_count(&self) -> usize {
        self.artifacts.len()
    }

    #[must_use]
    pub fn slate_count(&self) -> usize {
        self.slates.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len() + self.slates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty() && self.slates.is_empty()
    }
}
