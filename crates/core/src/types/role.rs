//! Portal roles.

use serde::{Deserialize, Serialize};

/// Error returned when a role string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid role: {0} (expected user, store_owner or admin)")]
pub struct RoleError(pub String);

/// Role of a portal account. Each role has its own dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular customer who browses and rates stores.
    #[default]
    User,
    /// Owner of one or more stores.
    StoreOwner,
    /// Manages users and stores.
    Admin,
}

impl Role {
    /// All roles, in the order shown in role pickers.
    pub const ALL: [Self; 3] = [Self::User, Self::StoreOwner, Self::Admin];

    /// Wire value (`user`, `store_owner`, `admin`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::StoreOwner => "store_owner",
            Self::Admin => "admin",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::StoreOwner => "Store Owner",
            Self::Admin => "Admin",
        }
    }

    /// Path prefix of the role's dashboard area.
    #[must_use]
    pub const fn area(self) -> &'static str {
        match self {
            Self::User => "/user",
            Self::StoreOwner => "/store",
            Self::Admin => "/admin",
        }
    }

    /// Landing page after login.
    #[must_use]
    pub const fn dashboard_path(self) -> &'static str {
        match self {
            Self::User => "/user/dashboard",
            Self::StoreOwner => "/store/dashboard",
            Self::Admin => "/admin/dashboard",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "store_owner" => Ok(Self::StoreOwner),
            "admin" => Ok(Self::Admin),
            _ => Err(RoleError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_through_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_rejects_unknown() {
        assert!("owner".parse::<Role>().is_err());
        assert!("Admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        assert_eq!(
            serde_json::to_string(&Role::StoreOwner).unwrap(),
            "\"store_owner\""
        );
    }

    #[test]
    fn test_dashboard_paths() {
        assert_eq!(Role::Admin.dashboard_path(), "/admin/dashboard");
        assert_eq!(Role::StoreOwner.dashboard_path(), "/store/dashboard");
        assert_eq!(Role::User.dashboard_path(), "/user/dashboard");
    }
}
