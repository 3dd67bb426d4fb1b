//! Caller roles.

use std::fmt;

use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Role attached to an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    /// Platform operator. Bypasses every entitlement check.
    SuperAdmin,
    /// Administrator of a single business.
    BusinessAdmin,
    /// Any other role string the backend hands out.
    Other(String),
}

impl Role {
    /// Parse a role string. Case, hyphens and spaces are ignored for the known roles.
    pub fn parse(s: &str) -> Self {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        match normalized.as_str() {
            "super_admin" | "superadmin" => Role::SuperAdmin,
            "business_admin" | "businessadmin" => Role::BusinessAdmin,
            _ => Role::Other(s.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::BusinessAdmin => "business_admin",
            Role::Other(s) => s,
        }
    }

    pub fn is_super_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }

    /// Business admins and any other business-scoped role.
    pub fn is_business_user(&self) -> bool {
        !self.is_super_admin()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        Role::parse(s)
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Role::parse(&raw))
    }
}

impl JsonSchema for Role {
    fn schema_name() -> String {
        "Role".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        String::json_schema(gen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("super_admin"), Role::SuperAdmin);
        assert_eq!(Role::parse("superadmin"), Role::SuperAdmin);
        assert_eq!(Role::parse("Super-Admin"), Role::SuperAdmin);
        assert_eq!(Role::parse("business_admin"), Role::BusinessAdmin);
        assert_eq!(Role::parse("BUSINESS ADMIN"), Role::BusinessAdmin);
        assert_eq!(Role::parse("viewer"), Role::Other("viewer".to_string()));
    }

    #[test]
    fn test_role_round_trip_string() {
        let role: Role = serde_json::from_str("\"superadmin\"").unwrap();
        assert!(role.is_super_admin());
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"super_admin\"");
    }

    #[test]
    fn test_other_role_keeps_original_spelling() {
        let role = Role::parse(" Moderator ");
        assert_eq!(role.as_str(), "Moderator");
        assert!(role.is_business_user());
    }
}
