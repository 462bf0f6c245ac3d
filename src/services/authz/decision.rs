use super::{PermissionRequirement, PrincipalClaims};

/// Role that satisfies every requirement regardless of granted permissions.
pub const SUPER_ADMINISTRATOR_ROLE: &str = "Super Administrator";

/// Outcome of an authorization check.
///
/// `Fail` is the ordinary result for "not allowed", not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Decision {
    Succeed,
    Fail,
}

impl Decision {
    pub fn is_succeed(self) -> bool {
        matches!(self, Self::Succeed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Succeed => "succeed",
            Self::Fail => "fail",
        }
    }
}

/// Evaluates `principal` against `requirement`.
///
/// 1. no principal -> Fail
/// 2. super administrator role -> Succeed
/// 3. exact (case-sensitive) permission name match -> Succeed
/// 4. otherwise -> Fail
pub fn evaluate(
    requirement: &PermissionRequirement,
    principal: Option<&PrincipalClaims>,
) -> Decision {
    let Some(claims) = principal else {
        return Decision::Fail;
    };

    if claims.role() == Some(SUPER_ADMINISTRATOR_ROLE) {
        return Decision::Succeed;
    }

    if claims.has_permission(requirement.permission()) {
        Decision::Succeed
    } else {
        Decision::Fail
    }
}
