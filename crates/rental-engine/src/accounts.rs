//! Account signup and lookup.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use rental_core::authz;
use rental_core::validation::validate_username;
use rental_core::{new_id, CoreError, NewUser, Role, User, ValidationError};

use crate::engine::require_user;
use crate::error::{EngineError, EngineResult, StoreError};
use crate::store::EntityStore;

pub struct AccountService<S> {
    store: Arc<S>,
}

impl<S: EntityStore> AccountService<S> {
    pub(crate) fn new(store: Arc<S>) -> Self {
        AccountService { store }
    }

    /// Creates a `user` or `seller` account.
    ///
    /// Admin accounts are provisioned out of band and cannot sign up.
    /// Usernames are unique regardless of case.
    pub async fn register_user(&self, new_user: &NewUser) -> EngineResult<User> {
        let username = validate_username(&new_user.username)?;

        if new_user.role == Role::Admin {
            warn!(%username, "Admin signup refused");
            return Err(CoreError::forbidden(&username, "register as admin").into());
        }

        if self.store.find_user_by_username(&username).await?.is_some() {
            return Err(duplicate_username(&username));
        }

        let user = User {
            id: new_id(),
            username,
            role: new_user.role,
            contact: new_user
                .contact
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            created_at: Utc::now(),
        };

        match self.store.save_user(&user).await {
            Ok(()) => {}
            // Lost a race with a concurrent signup
            Err(StoreError::Duplicate { .. }) => return Err(duplicate_username(&user.username)),
            Err(e) => return Err(e.into()),
        }

        info!(user_id = %user.id, username = %user.username, role = %user.role, "User registered");
        Ok(user)
    }

    pub async fn get_user(&self, user_id: &str) -> EngineResult<User> {
        require_user(self.store.as_ref(), user_id).await
    }

    /// Every account, oldest first. Admin only.
    pub async fn list_users(&self, acting_user_id: &str) -> EngineResult<Vec<User>> {
        let actor = require_user(self.store.as_ref(), acting_user_id).await?;
        authz::ensure_can_manage_users(&actor)?;
        Ok(self.store.list_users().await?)
    }
}

fn duplicate_username(username: &str) -> EngineError {
    ValidationError::Duplicate {
        field: "username".to_string(),
        value: username.to_string(),
    }
    .into()
}
