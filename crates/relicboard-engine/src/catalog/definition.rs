use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use serde::{Deserialize, Serialize};

use crate::Rotation;

/// Rarity tier of an artifact.
///
/// Each tier multiplies the artifact's level by a fixed weight:
///
/// | Rarity    | Weight |
/// |-----------|--------|
/// | Common    | 1.0    |
/// | UnCommon  | 1.2    |
/// | Rare      | 1.5    |
/// | Legendary | 2.5    |
///
/// Unrecognized tiers deserialize to [`Rarity::Unknown`] and weigh 1.0.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    #[default]
    Common,
    UnCommon,
    Rare,
    Legendary,
    #[serde(other)]
    Unknown,
}

impl Rarity {
    #[must_use]
    pub const fn weight(self) -> f64 {
        match self {
            Self::Common | Self::Unknown => 1.0,
            Self::UnCommon => 1.2,
            Self::Rare => 1.5,
            Self::Legendary => 2.5,
        }
    }
}

/// Placement rule an item must satisfy to be effective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    /// Must sit on row 0.
    TopRow,
    /// Must sit on the last row.
    BottomRow,
    /// Must sit on any border cell.
    Edge,
    /// Must not touch any border.
    Inner,
    /// Must sit in the first or last column.
    HorizontalEnds,
    /// Violated when the left or right neighbor is occupied.
    AdjacentHorizontalEmpty,
    /// Must have a grimoire-tagged artifact immediately to its right.
    RequiresGrimoireRight,
    /// Any condition string this version does not know; never violated.
    #[serde(other)]
    Unrecognized,
}

/// Condition attached to an item definition.
///
/// Records may use either a bare tag (`"edge"`) or the structured form
/// (`{ "type": "edge", "unlockable": true }`). Only the structured form can be
/// lifted by a `limitUnlock` effect, and only when `unlockable` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Condition {
    Structured {
        #[serde(rename = "type")]
        kind: ConditionKind,
        #[serde(default)]
        unlockable: bool,
    },
    Bare(ConditionKind),
}

impl Condition {
    #[must_use]
    pub fn kind(self) -> ConditionKind {
        match self {
            Self::Structured { kind, .. } | Self::Bare(kind) => kind,
        }
    }

    /// Returns `true` if a `limitUnlock` effect on the item's cell lifts this condition.
    #[must_use]
    pub fn is_unlockable(self) -> bool {
        matches!(
            self,
            Self::Structured {
                unlockable: true,
                ..
            }
        )
    }
}

/// Special effect a slate buff can leave on a cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EffectTag {
    /// Plain level buff with no special marker (`"none"`).
    None,
    /// Lifts unlockable conditions of the artifact on the target cell (`"limitUnlock"`).
    LimitUnlock,
    /// A named effect with no scoring rule attached.
    Other(String),
}

impl EffectTag {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::None => "none",
            Self::LimitUnlock => "limitUnlock",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for EffectTag {
    fn from(value: String) -> Self {
        match value.as_str() {
            "none" => Self::None,
            "limitUnlock" => Self::LimitUnlock,
            _ => Self::Other(value),
        }
    }
}

impl From<EffectTag> for String {
    fn from(value: EffectTag) -> Self {
        match value {
            EffectTag::Other(name) => name,
            tag => tag.as_str().to_owned(),
        }
    }
}

impl fmt::Display for EffectTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type RawBuffEntry = (i32, i32, i32, EffectTag);

/// A single buff projected by a slate, stored as `[dx, dy, magnitude, effect]`.
///
/// `dy` is positive toward the top row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawBuffEntry", into = "RawBuffEntry")]
pub struct BuffEntry {
    pub dx: i32,
    pub dy: i32,
    pub magnitude: i32,
    pub effect: EffectTag,
}

impl BuffEntry {
    #[must_use]
    pub fn new(dx: i32, dy: i32, magnitude: i32, effect: EffectTag) -> Self {
        Self {
            dx,
            dy,
            magnitude,
            effect,
        }
    }
}

impl From<RawBuffEntry> for BuffEntry {
    fn from((dx, dy, magnitude, effect): RawBuffEntry) -> Self {
        Self::new(dx, dy, magnitude, effect)
    }
}

impl From<BuffEntry> for RawBuffEntry {
    fn from(entry: BuffEntry) -> Self {
        (entry.dx, entry.dy, entry.magnitude, entry.effect)
    }
}

/// The buffs of a slate, either fixed or keyed by rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BuffTable {
    Fixed(Vec<BuffEntry>),
    ByRotation(BTreeMap<Rotation, Vec<BuffEntry>>),
}

impl Default for BuffTable {
    fn default() -> Self {
        Self::Fixed(Vec::new())
    }
}

impl BuffTable {
    /// Returns the buffs for a rotation.
    ///
    /// A fixed table ignores the rotation. A rotation-keyed table falls back to the
    /// 0° list when the rotation has no entry, and to no buffs when that is missing too.
    #[must_use]
    pub fn entries(&self, rotation: Rotation) -> &[BuffEntry] {
        match self {
            Self::Fixed(entries) => entries,
            Self::ByRotation(table) => table
                .get(&rotation)
                .or_else(|| table.get(&Rotation::Deg0))
                .map(Vec::as_slice)
                .unwrap_or_default(),
        }
    }
}

/// A passive, score-bearing item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub condition: Option<Condition>,
}

impl ArtifactDefinition {
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// A modifier item projecting buffs onto nearby cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlateDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub condition: Option<Condition>,
    #[serde(default)]
    pub rotatable: bool,
    #[serde(rename = "buffcoords", default)]
    pub buff_table: BuffTable,
}

impl SlateDefinition {
    /// Returns the buffs this slate projects when placed with the given rotation.
    ///
    /// Non-rotatable slates always use their 0° (or fixed) buffs.
    #[must_use]
    pub fn buffs(&self, rotation: Rotation) -> &[BuffEntry] {
        let rotation = if self.rotatable {
            rotation
        } else {
            Rotation::Deg0
        };
        self.buff_table.entries(rotation)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_rarity_weights() {
        assert!((Rarity::Common.weight() - 1.0).abs() < f64::EPSILON);
        assert!((Rarity::UnCommon.weight() - 1.2).abs() < f64::EPSILON);
        assert!((Rarity::Rare.weight() - 1.5).abs() < f64::EPSILON);
        assert!((Rarity::Legendary.weight() - 2.5).abs() < f64::EPSILON);

        let unknown: Rarity = serde_json::from_value(json!("Mythic")).unwrap();
        assert_eq!(unknown, Rarity::Unknown);
        assert!((unknown.weight() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_condition_forms() {
        let bare: Condition = serde_json::from_value(json!("top_row")).unwrap();
        assert_eq!(bare, Condition::Bare(ConditionKind::TopRow));
        assert!(!bare.is_unlockable());

        let gated: Condition =
            serde_json::from_value(json!({ "type": "inner", "unlockable": true })).unwrap();
        assert_eq!(gated.kind(), ConditionKind::Inner);
        assert!(gated.is_unlockable());

        let locked: Condition = serde_json::from_value(json!({ "type": "edge" })).unwrap();
        assert_eq!(locked.kind(), ConditionKind::Edge);
        assert!(!locked.is_unlockable());

        let unknown: Condition = serde_json::from_value(json!("diagonal")).unwrap();
        assert_eq!(unknown.kind(), ConditionKind::Unrecognized);
    }

    #[test]
    fn test_effect_tag_strings() {
        assert_eq!(EffectTag::from("none".to_owned()), EffectTag::None);
        assert_eq!(
            EffectTag::from("limitUnlock".to_owned()),
            EffectTag::LimitUnlock
        );
        assert_eq!(
            EffectTag::from("sparkle".to_owned()),
            EffectTag::Other("sparkle".to_owned())
        );
        assert_eq!(String::from(EffectTag::LimitUnlock), "limitUnlock");
    }

    #[test]
    fn test_buff_entry_tuple_form() {
        let entry: BuffEntry = serde_json::from_value(json!([1, -2, 3, "limitUnlock"])).unwrap();
        assert_eq!(entry, BuffEntry::new(1, -2, 3, EffectTag::LimitUnlock));
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!([1, -2, 3, "limitUnlock"])
        );
    }

    #[test]
    fn test_rotatable_slate_falls_back_to_zero_degrees() {
        let slate: SlateDefinition = serde_json::from_value(json!({
            "id": "slate_1",
            "name": "Approach",
            "rotatable": true,
            "buffcoords": {
                "0": [[0, 1, 1, "none"]],
                "90": [[1, 0, 2, "none"]]
            }
        }))
        .unwrap();

        assert_eq!(slate.buffs(Rotation::Deg0), &[BuffEntry::new(0, 1, 1, EffectTag::None)]);
        assert_eq!(slate.buffs(Rotation::Deg90), &[BuffEntry::new(1, 0, 2, EffectTag::None)]);
        assert_eq!(slate.buffs(Rotation::Deg180), slate.buffs(Rotation::Deg0));
    }

    #[test]
    fn test_fixed_slate_ignores_rotation() {
        let slate: SlateDefinition = serde_json::from_value(json!({
            "id": "slate_2",
            "name": "Handshake",
            "condition": "bottom_row",
            "buffcoords": [[0, 1, 1, "none"], [0, 2, 1, "none"]]
        }))
        .unwrap();

        assert!(!slate.rotatable);
        assert_eq!(slate.condition, Some(Condition::Bare(ConditionKind::BottomRow)));
        for rotation in Rotation::ALL {
            assert_eq!(slate.buffs(rotation).len(), 2);
        }
    }

    #[test]
    fn test_non_rotatable_slate_uses_zero_degree_entry_of_keyed_table() {
        let slate: SlateDefinition = serde_json::from_value(json!({
            "id": "slate_3",
            "name": "Fixed Keyed",
            "buffcoords": { "0": [[1, 0, 1, "none"]], "180": [[-1, 0, 1, "none"]] }
        }))
        .unwrap();

        assert_eq!(slate.buffs(Rotation::Deg180), &[BuffEntry::new(1, 0, 1, EffectTag::None)]);
    }

    #[test]
    fn test_artifact_defaults() {
        let artifact: ArtifactDefinition =
            serde_json::from_value(json!({ "id": "artifact_9", "name": "Pebble" })).unwrap();
        assert_eq!(artifact.rarity, Rarity::Common);
        assert!(artifact.tags.is_empty());
        assert!(artifact.condition.is_none());
        assert!(!artifact.has_tag("grimoire"));
    }
}
