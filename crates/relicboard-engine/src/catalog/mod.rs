//! Item definitions and the catalog that resolves item ids.
//!
//! Two kinds of items exist:
//!
//! - [`ArtifactDefinition`] - Passive, score-bearing pieces weighted by [`Rarity`]
//! - [`SlateDefinition`] - Modifier pieces projecting [`BuffEntry`]s onto nearby cells,
//!   optionally keyed by [`Rotation`](crate::Rotation)
//!
//! Both may carry a [`Condition`] restricting where on the board they are effective.
//!
//! The [`ItemCatalog`] is built once from the two collections and never mutated
//! afterwards, so it can be shared by reference between any number of evaluators.
//!
//! # Record Format
//!
//! ```
//! use relicboard_engine::{ArtifactDefinition, SlateDefinition};
//!
//! let artifact: ArtifactDefinition = serde_json::from_str(
//!     r#"{ "id": "artifact_1", "name": "Hourglass", "rarity": "Rare", "condition": "edge" }"#,
//! )
//! .unwrap();
//! assert_eq!(artifact.rarity.weight(), 1.5);
//!
//! let slate: SlateDefinition = serde_json::from_str(
//!     r#"{
//!         "id": "slate_1",
//!         "name": "Approach",
//!         "rotatable": true,
//!         "buffcoords": { "0": [[0, 1, 1, "none"]], "90": [[1, 0, 1, "none"]] }
//!     }"#,
//! )
//! .unwrap();
//! assert!(slate.rotatable);
//! ```

pub use self::{definition::*, item_catalog::*};

mod definition;
mod item_catalog;
