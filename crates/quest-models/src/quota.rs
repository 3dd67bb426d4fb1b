//! Finite-or-unlimited quantities.

use std::fmt;

use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::tier::UNLIMITED;

/// A credit or seat balance that may be unlimited.
///
/// `Unlimited` orders above every `Limited` value. On the wire it is the
/// plain integer, with `-1` standing for unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Quota {
    Limited(u64),
    Unlimited,
}

impl Quota {
    pub const ZERO: Quota = Quota::Limited(0);

    /// Interpret a raw backend limit. `-1` is unlimited, other negatives clamp to zero.
    pub fn from_limit(raw: i64) -> Self {
        if raw == UNLIMITED {
            Quota::Unlimited
        } else {
            Quota::Limited(clamp_count(raw))
        }
    }

    pub fn is_unlimited(&self) -> bool {
        matches!(self, Quota::Unlimited)
    }

    /// True when nothing is left.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Quota::Limited(0))
    }

    /// The finite amount, if any.
    pub fn limited(&self) -> Option<u64> {
        match self {
            Quota::Limited(n) => Some(*n),
            Quota::Unlimited => None,
        }
    }

    /// Whether `used` is still below this quota.
    pub fn admits(&self, used: u64) -> bool {
        match self {
            Quota::Limited(n) => used < *n,
            Quota::Unlimited => true,
        }
    }

    pub fn saturating_add(self, extra: u64) -> Self {
        match self {
            Quota::Limited(n) => Quota::Limited(n.saturating_add(extra)),
            Quota::Unlimited => Quota::Unlimited,
        }
    }

    /// Remaining amount after `used`, never negative.
    pub fn remaining_after(self, used: u64) -> Self {
        match self {
            Quota::Limited(n) => Quota::Limited(n.saturating_sub(used)),
            Quota::Unlimited => Quota::Unlimited,
        }
    }

    /// Wire representation.
    pub fn as_i64(&self) -> i64 {
        match self {
            Quota::Limited(n) => i64::try_from(*n).unwrap_or(i64::MAX),
            Quota::Unlimited => UNLIMITED,
        }
    }
}

impl Default for Quota {
    fn default() -> Self {
        Quota::ZERO
    }
}

impl fmt::Display for Quota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quota::Limited(n) => write!(f, "{}", n),
            Quota::Unlimited => write!(f, "unlimited"),
        }
    }
}

impl Serialize for Quota {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_i64())
    }
}

impl<'de> Deserialize<'de> for Quota {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Quota::from_limit(i64::deserialize(deserializer)?))
    }
}

impl JsonSchema for Quota {
    fn schema_name() -> String {
        "Quota".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        i64::json_schema(gen)
    }
}

/// Clamp a signed backend counter into an unsigned count.
pub fn clamp_count(raw: i64) -> u64 {
    u64::try_from(raw).unwrap_or(0)
}
