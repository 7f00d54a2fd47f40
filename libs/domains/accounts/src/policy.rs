//! Role hierarchy: the single place that decides who may act on whom.

use crate::error::{AccountError, AccountResult};
use crate::models::Role;

pub const SUPERADMIN_REQUIRED: &str = "try to access superadmin api without superadmin rights";
pub const NOT_ENOUGH_RIGHTS: &str = "not enough rights to perform this action";

/// Administrative actions gated by the role hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    Promote,
    Demote,
    Ban,
    Unban,
    Inspect,
}

/// Whether `actor` may administer an account holding `target`.
///
/// Admins and superadmins may act on users; only a superadmin may act on an
/// admin; nobody may act on a superadmin.
pub fn can_administer(actor: Role, target: Role) -> bool {
    match (actor, target) {
        (Role::Admin | Role::Superadmin, Role::User) => true,
        (Role::Superadmin, Role::Admin) => true,
        _ => false,
    }
}

/// Promotion and demotion are reserved to superadmins
pub fn can_change_roles(actor: Role) -> bool {
    actor == Role::Superadmin
}

pub fn can_inspect(actor: Role) -> bool {
    actor >= Role::Admin
}

/// Authorize `action` by `actor`. `target` is the target's current role, when
/// the check depends on it.
pub fn authorize(actor: Role, action: AdminAction, target: Option<Role>) -> AccountResult<()> {
    let allowed = match action {
        AdminAction::Promote | AdminAction::Demote => {
            if !can_change_roles(actor) {
                return Err(AccountError::InsufficientRole(SUPERADMIN_REQUIRED.to_string()));
            }
            // a superadmin's role is never rewritten through promote/demote
            target != Some(Role::Superadmin)
        }
        AdminAction::Ban | AdminAction::Unban => {
            target.is_some_and(|target| can_administer(actor, target))
        }
        AdminAction::Inspect => can_inspect(actor),
    };

    if allowed {
        Ok(())
    } else {
        tracing::warn!(%actor, ?action, ?target, "Administrative action denied");
        Err(AccountError::InsufficientRole(NOT_ENOUGH_RIGHTS.to_string()))
    }
}
