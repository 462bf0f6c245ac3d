use std::collections::HashSet;

/// Claim type carrying the caller's single role.
pub const ROLE_CLAIM: &str = "role";
/// Claim type carrying granted permission names (repeated).
pub const PERMISSIONS_CLAIM: &str = "permissions";

/// Read-only view of an authenticated caller's authorization claims.
///
/// - `role` は単一値 (存在しない場合もある)
/// - `permissions` は集合。重複した claim は 1 つにまとまり、claim が無ければ空集合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrincipalClaims {
    role: Option<String>,
    permissions: HashSet<String>,
}

impl PrincipalClaims {
    pub fn new<I, P>(role: Option<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            role,
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds the view from a multiset of `(claim_type, value)` pairs.
    ///
    /// Only `role` and `permissions` are read; if several `role` claims are
    /// present the first one wins.
    pub fn from_claim_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut role = None;
        let mut permissions = HashSet::new();

        for (claim_type, value) in pairs {
            match claim_type {
                ROLE_CLAIM if role.is_none() => role = Some(value.to_string()),
                PERMISSIONS_CLAIM => {
                    permissions.insert(value.to_string());
                }
                _ => {}
            }
        }

        Self { role, permissions }
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    pub fn permissions(&self) -> &HashSet<String> {
        &self.permissions
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    /// Permission names in a stable order (for responses and logs).
    pub fn sorted_permissions(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.permissions().iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_permission_claims_collapse() {
        let claims = PrincipalClaims::from_claim_pairs([
            ("role", "Supervisor"),
            ("permissions", "Orders.Read"),
            ("permissions", "Orders.Read"),
            ("permissions", "Orders.Write"),
        ]);

        assert_eq!(claims.role(), Some("Supervisor"));
        assert_eq!(claims.permissions().len(), 2);
        assert_eq!(claims.sorted_permissions(), vec!["Orders.Read", "Orders.Write"]);
    }

    #[test]
    fn missing_permissions_claim_is_empty_set() {
        let claims = PrincipalClaims::from_claim_pairs([("role", "Store Seller")]);

        assert!(claims.permissions().is_empty());
        assert!(!claims.has_permission("Orders.Read"));
    }

    #[test]
    fn first_role_claim_wins_and_others_are_ignored() {
        let claims = PrincipalClaims::from_claim_pairs([
            ("email", "ana@camihogar.com"),
            ("role", "Store Manager"),
            ("role", "Super Administrator"),
        ]);

        assert_eq!(claims.role(), Some("Store Manager"));
        assert!(claims.permissions().is_empty());
    }

    #[test]
    fn no_role_claim_means_none() {
        let claims = PrincipalClaims::new(None, ["Users.Read"]);

        assert_eq!(claims.role(), None);
        assert!(claims.has_permission("Users.Read"));
    }
}
