//! Permission catalog: one requirement per guarded operation.
//!
//! Names are flat, opaque identifiers in `Area.Action` form. They must match
//! the values the token issuer writes into the `permissions` claim.

use super::PermissionRequirement;

// users
pub const USERS_READ: PermissionRequirement = PermissionRequirement::from_static("Users.Read");
pub const USERS_CREATE: PermissionRequirement = PermissionRequirement::from_static("Users.Create");
pub const USERS_UPDATE: PermissionRequirement = PermissionRequirement::from_static("Users.Update");
pub const USERS_DELETE: PermissionRequirement = PermissionRequirement::from_static("Users.Delete");

// exchange rates
pub const EXCHANGE_RATES_READ: PermissionRequirement =
    PermissionRequirement::from_static("ExchangeRates.Read");
pub const EXCHANGE_RATES_CREATE: PermissionRequirement =
    PermissionRequirement::from_static("ExchangeRates.Create");
