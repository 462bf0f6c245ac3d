use std::{borrow::Cow, fmt};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequirementError {
    #[error("permission name must not be empty")]
    Empty,
}

/// A single permission name that must be held for an operation to proceed.
///
/// Route guards use the `const` values in [`super::permissions`]; names that
/// arrive at runtime go through [`PermissionRequirement::try_new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PermissionRequirement {
    permission: Cow<'static, str>,
}

impl PermissionRequirement {
    /// Builds a requirement from a static name. An empty name fails at compile
    /// time when used in a `const`.
    pub const fn from_static(permission: &'static str) -> Self {
        assert!(!permission.is_empty(), "permission name must not be empty");
        Self {
            permission: Cow::Borrowed(permission),
        }
    }

    pub fn try_new(permission: impl Into<String>) -> Result<Self, RequirementError> {
        let permission = permission.into();
        if permission.trim().is_empty() {
            return Err(RequirementError::Empty);
        }
        Ok(Self {
            permission: Cow::Owned(permission),
        })
    }

    pub fn permission(&self) -> &str {
        &self.permission
    }
}

impl fmt::Display for PermissionRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.permission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDERS_READ: PermissionRequirement = PermissionRequirement::from_static("Orders.Read");

    #[test]
    fn static_requirement_keeps_name() {
        assert_eq!(ORDERS_READ.permission(), "Orders.Read");
        assert_eq!(ORDERS_READ.to_string(), "Orders.Read");
    }

    #[test]
    fn try_new_rejects_blank_names() {
        assert_eq!(
            PermissionRequirement::try_new(""),
            Err(RequirementError::Empty)
        );
        assert_eq!(
            PermissionRequirement::try_new("   "),
            Err(RequirementError::Empty)
        );
    }

    #[test]
    fn try_new_keeps_name_verbatim() {
        let req = PermissionRequirement::try_new("Payments.Refund").unwrap();
        assert_eq!(req.permission(), "Payments.Refund");
        assert_eq!(req, PermissionRequirement::from_static("Payments.Refund"));
    }
}
