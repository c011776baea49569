use std::fmt;

use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Rotation of a placed slate.
///
/// Represents one of four quarter turns:
///
/// - `0°` (default orientation)
/// - `90°`
/// - `180°`
/// - `270°`
///
/// Only meaningful for rotatable slates; every other item ignores it.
///
/// Serialized as the integer angle. Deserialization also accepts numeric strings, so
/// rotations can be used as JSON object keys (`{ "90": [...] }`).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const ALL: [Self; 4] = [Self::Deg0, Self::Deg90, Self::Deg180, Self::Deg270];

    #[must_use]
    pub const fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    #[must_use]
    pub const fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Self::Deg0),
            90 => Some(Self::Deg90),
            180 => Some(Self::Deg180),
            270 => Some(Self::Deg270),
            _ => None,
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Allows drawing a uniformly random rotation with `rng.random()`.
impl Distribution<Rotation> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Rotation {
        Rotation::ALL[rng.random_range(0..Rotation::ALL.len())]
    }
}

impl Serialize for Rotation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u16(self.degrees())
    }
}

impl<'de> Deserialize<'de> for Rotation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(RotationVisitor)
    }
}

struct RotationVisitor;

impl RotationVisitor {
    fn from_u64<E>(value: u64) -> Result<Rotation, E>
    where
        E: de::Error,
    {
        u16::try_from(value)
            .ok()
            .and_then(Rotation::from_degrees)
            .ok_or_else(|| E::custom(format!("rotation must be 0, 90, 180 or 270, got {value}")))
    }
}

impl de::Visitor<'_> for RotationVisitor {
    type Value = Rotation;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a rotation angle (0, 90, 180 or 270)")
    }

    fn visit_u64<E>(self, value: u64) -> Result<Rotation, E>
    where
        E: de::Error,
    {
        Self::from_u64(value)
    }

    fn visit_i64<E>(self, value: i64) -> Result<Rotation, E>
    where
        E: de::Error,
    {
        let value = u64::try_from(value)
            .map_err(|_| E::custom(format!("rotation must not be negative, got {value}")))?;
        Self::from_u64(value)
    }

    fn visit_str<E>(self, value: &str) -> Result<Rotation, E>
    where
        E: de::Error,
    {
        let degrees = value
            .parse::<u64>()
            .map_err(|e| E::custom(format!("invalid rotation: {value} ({e})")))?;
        Self::from_u64(degrees)
    }
}
