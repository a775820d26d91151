// src/engine/guard.rs

use crate::{error::AppError, models::user::ROLE_ADMIN, utils::jwt::Claims};

/// The authenticated identity on whose behalf an engine operation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i64,
    pub role: String,
}

impl Actor {
    pub fn new(user_id: i64, role: impl Into<String>) -> Self {
        Self {
            user_id,
            role: role.into(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

impl TryFrom<&Claims> for Actor {
    type Error = AppError;

    fn try_from(claims: &Claims) -> Result<Self, Self::Error> {
        let user_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::AuthError("Invalid token subject".to_string()))?;
        Ok(Actor::new(user_id, claims.role.clone()))
    }
}

/// Decides whether an actor may mutate a quiz (or add content under it).
///
/// The only rule is ownership. Admins bypass it only when `admin_override`
/// is switched on.
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnershipGuard {
    admin_override: bool,
}

impl OwnershipGuard {
    pub fn new(admin_override: bool) -> Self {
        Self { admin_override }
    }

    pub fn authorize(&self, actor: &Actor, owner_id: i64, action: &str) -> Result<(), AppError> {
        if actor.user_id == owner_id {
            return Ok(());
        }
        if self.admin_override && actor.is_admin() {
            tracing::info!("Admin {} overriding ownership to {}", actor.user_id, action);
            return Ok(());
        }

        tracing::warn!("User {} denied: {}", actor.user_id, action);
        Err(AppError::Forbidden(format!(
            "You can only {} your own quizzes",
            action
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::ROLE_USER;

    #[test]
    fn owner_is_allowed() {
        let guard = OwnershipGuard::default();
        assert!(guard.authorize(&Actor::new(7, ROLE_USER), 7, "update").is_ok());
    }

    #[test]
    fn non_owner_is_forbidden() {
        let guard = OwnershipGuard::default();
        let err = guard.authorize(&Actor::new(8, ROLE_USER), 7, "update").unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn admin_needs_override_enabled() {
        let admin = Actor::new(1, ROLE_ADMIN);
        assert!(OwnershipGuard::new(false).authorize(&admin, 7, "delete").is_err());
        assert!(OwnershipGuard::new(true).authorize(&admin, 7, "delete").is_ok());
    }

    #[test]
    fn override_does_not_help_regular_users() {
        let guard = OwnershipGuard::new(true);
        assert!(guard.authorize(&Actor::new(2, ROLE_USER), 7, "delete").is_err());
    }

    #[test]
    fn actor_from_claims_rejects_non_numeric_subject() {
        let claims = Claims {
            sub: "abc".to_string(),
            email: "a@b.c".to_string(),
            role: ROLE_USER.to_string(),
            exp: 0,
        };
        assert!(Actor::try_from(&claims).is_err());
    }
}
