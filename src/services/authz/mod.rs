/*!
 * Permission-based authorization
 *
 * Responsibility:
 * - 操作ごとに宣言された PermissionRequirement と、呼び出し元の claims を突き合わせる
 * - 判定は純粋関数 (I/O なし・共有可変状態なし)。HTTP への変換は middleware 側の責務
 *
 * Public API:
 * - PermissionRequirement / RequirementError
 * - PrincipalClaims
 * - Decision / evaluate
 * - permissions (catalog)
 */

mod claims;
mod decision;
pub mod permissions;
mod requirement;

pub use claims::{PERMISSIONS_CLAIM, PrincipalClaims, ROLE_CLAIM};
pub use decision::{Decision, SUPER_ADMINISTRATOR_ROLE, evaluate};
pub use requirement::{PermissionRequirement, RequirementError};
