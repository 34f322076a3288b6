//! Ownership guard.
//!
//! Every lookup is constrained by `user_id`. A record that does not exist and
//! a record owned by someone else produce the same `KeyNotFound` error.

use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, ingredients, recipes};

use super::Engine;

/// Reject calls that carry no acting user.
pub(super) fn require_identity(user_id: &str) -> ResultEngine<()> {
    if user_id.trim().is_empty() {
        return Err(EngineError::Unauthenticated);
    }
    Ok(())
}

/// Generates `find_*` and `require_*` lookups of an owned entity.
macro_rules! impl_owned_lookup {
    ($find_fn:ident, $require_fn:ident, $module:ident, $err_msg:literal) => {
        async fn $find_fn(
            &self,
            db: &DatabaseTransaction,
            user_id: &str,
            id: Uuid,
        ) -> ResultEngine<Option<$module::Model>> {
            $module::Entity::find_by_id(id.to_string())
                .filter($module::Column::UserId.eq(user_id))
                .one(db)
                .await
                .map_err(Into::into)
        }

        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            user_id: &str,
            id: Uuid,
        ) -> ResultEngine<$module::Model> {
            self.$find_fn(db, user_id, id)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound($err_msg.to_string()))
        }
    };
}

impl Engine {
    impl_owned_lookup!(
        find_ingredient,
        require_ingredient,
        ingredients,
        "ingredient not exists"
    );

    impl_owned_lookup!(find_recipe, require_recipe, recipes, "recipe not exists");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_identity_is_unauthenticated() {
        assert_eq!(require_identity(""), Err(EngineError::Unauthenticated));
        assert_eq!(require_identity("   "), Err(EngineError::Unauthenticated));
    }

    #[test]
    fn identity_is_accepted() {
        assert!(require_identity("alice").is_ok());
    }
}
