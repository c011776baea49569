use std::str::FromStr;

use relicboard_engine::PlacedItem;
use serde::Deserialize;

const DEFAULT_PRIORITY: f64 = 1.0;

/// One item to place, as sent by clients.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ItemRequest {
    pub id: String,
    #[serde(default = "default_priority")]
    pub priority: f64,
    #[serde(default)]
    pub upgrade: u32,
}

fn default_priority() -> f64 {
    DEFAULT_PRIORITY
}

fn is_valid_priority(priority: f64) -> bool {
    priority.is_finite() && priority > 0.0
}

impl ItemRequest {
    /// Rejects non-positive or non-finite priorities, which deserialization lets through.
    pub fn validate(&self) -> Result<(), ParseItemError> {
        if is_valid_priority(self.priority) {
            Ok(())
        } else {
            Err(ParseItemError::Priority {
                input: self.priority.to_string(),
            })
        }
    }
}

impl From<ItemRequest> for PlacedItem {
    fn from(request: ItemRequest) -> Self {
        PlacedItem::new(request.id)
            .with_priority_weight(request.priority)
            .with_upgrade_level(request.upgrade)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseItemError {
    #[display("item id is empty")]
    EmptyId,
    #[display("invalid priority: {input}")]
    Priority { input: String },
    #[display("invalid upgrade level: {input}")]
    Upgrade { input: String },
}

/// Parses `ID[:PRIORITY[:UPGRADE]]`.
impl FromStr for ItemRequest {
    type Err = ParseItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let id = parts.next().unwrap_or_default().trim();
        if id.is_empty() {
            return Err(ParseItemError::EmptyId);
        }
        let priority = match parts.next() {
            Some(input) => input
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|p| is_valid_priority(*p))
                .ok_or_else(|| ParseItemError::Priority {
                    input: input.to_owned(),
                })?,
            None => DEFAULT_PRIORITY,
        };
        let upgrade = match parts.next() {
            Some(input) => input
                .trim()
                .parse()
                .map_err(|_| ParseItemError::Upgrade {
                    input: input.to_owned(),
                })?,
            None => 0,
        };
        Ok(Self {
            id: id.to_owned(),
            priority,
            upgrade,
        })
    }
}

/// Body of an optimization request. Every field is optional here so that callers
/// can report exactly which one is missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OptimizeRequest {
    pub items: Option<Vec<ItemRequest>>,
    pub width: Option<usize>,
    pub height: Option<usize>,
}

#[cfg(test)]
mod tests {
    use relicboard_engine::Rotation;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_item_argument() {
        assert_eq!(
            "slate_2".parse::<ItemRequest>().unwrap(),
            ItemRequest {
                id: "slate_2".to_owned(),
                priority: 1.0,
                upgrade: 0
            }
        );
        assert_eq!(
            "artifact_115:1.5:2".parse::<ItemRequest>().unwrap(),
            ItemRequest {
                id: "artifact_115".to_owned(),
                priority: 1.5,
                upgrade: 2
            }
        );
        assert_eq!(
            ":1.0".parse::<ItemRequest>(),
            Err(ParseItemError::EmptyId)
        );
        assert!(matches!(
            "a:fast".parse::<ItemRequest>(),
            Err(ParseItemError::Priority { .. })
        ));
        assert!(matches!(
            "a:0".parse::<ItemRequest>(),
            Err(ParseItemError::Priority { .. })
        ));
        assert!(matches!(
            "a:1:-2".parse::<ItemRequest>(),
            Err(ParseItemError::Upgrade { .. })
        ));
    }

    #[test]
    fn test_validate_priority() {
        let item = |priority| ItemRequest {
            id: "a".to_owned(),
            priority,
            upgrade: 0,
        };
        assert_eq!(item(0.5).validate(), Ok(()));
        for priority in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                item(priority).validate(),
                Err(ParseItemError::Priority { .. })
            ));
        }

        let request: OptimizeRequest =
            serde_json::from_value(json!({ "items": [{ "id": "a", "priority": -2.0 }] })).unwrap();
        assert_eq!(
            request.items.unwrap()[0].validate(),
            Err(ParseItemError::Priority {
                input: "-2".to_owned()
            })
        );
    }

    #[test]
    fn test_request_defaults() {
        let request: OptimizeRequest = serde_json::from_value(json!({
            "items": [{ "id": "a" }, { "id": "b", "priority": 2.0, "upgrade": 3 }],
            "width": 4
        }))
        .unwrap();
        let items = request.items.unwrap();
        assert_eq!(items[0].priority, 1.0);
        assert_eq!(items[0].upgrade, 0);
        assert_eq!(request.width, Some(4));
        assert_eq!(request.height, None);

        let placed = PlacedItem::from(items[1].clone());
        assert_eq!(placed.item_id(), "b");
        assert_eq!(placed.upgrade_level(), 3);
        assert_eq!(placed.rotation(), Rotation::Deg0);
    }
}
