use serde::Deserialize;
use strum::{AsRefStr, Display, EnumString, VariantArray};

#[derive(
    EnumString,
    VariantArray,
    Display,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Deserialize,
)]
pub enum Role {
    SuperAdmin,
    Manager,
    #[default]
    Rep,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "Super admin",
            Role::Manager => "Manager",
            Role::Rep => "Representative",
        }
    }

    /// Managers and super admins see every representative's schedule.
    pub fn sees_all_assignments(&self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Manager)
    }
}

#[derive(
    EnumString,
    VariantArray,
    Display,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Deserialize,
)]
pub enum State {
    #[default]
    Active,
    Suspended,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_role_round_trips_through_text_column() {
        for role in Role::VARIANTS {
            assert_eq!(Role::from_str(role.as_ref()).unwrap(), *role);
        }
        assert!(Role::from_str("admin").is_err());
    }
}
