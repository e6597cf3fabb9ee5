//! Users (customers) view.

use shopdesk_core::{UserId, UserRole};
use tracing::{info, instrument};

use super::{Collection, ResourceView, call, schema_error};
use crate::api::{ApiClient, decode_item, decode_list};
use crate::components::TableColumn;
use crate::error::AdminError;
use crate::models::{User, UserUpdate};

const USERS_PATH: &str = "/admin/users";

/// Account management.
///
/// Shows customers (`role = user`) unless the role filter is changed.
#[derive(Debug)]
pub struct UsersView {
    api: ApiClient,
    cache: Collection<User>,
    role_filter: Option<UserRole>,
}

impl UsersView {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self {
            api,
            cache: Collection::new("User"),
            role_filter: Some(UserRole::User),
        }
    }

    /// Restrict the table to one role, or show everyone with `None`.
    pub const fn set_role_filter(&mut self, role: Option<UserRole>) {
        self.role_filter = role;
    }

    /// Fetch every account and replace the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn list(&mut self) -> Result<&[User], AdminError> {
        const ACTION: &str = "Failed to fetch users";
        let value = call(&self.api, ACTION, self.api.get_value(USERS_PATH, &[])).await?;
        let users = decode_list(value, "users").map_err(schema_error(ACTION))?;
        self.cache.replace_all(users);
        Ok(self.cache.items())
    }

    /// Edit an account's profile and role.
    ///
    /// The backend acknowledges without echoing the account, so the list is
    /// refetched unless the response carries it.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownEntity` if `id` was not listed, or an
    /// error if the request fails.
    #[instrument(skip(self, update), fields(user_id = %id))]
    pub async fn update(&mut self, id: UserId, update: &UserUpdate) -> Result<User, AdminError> {
        const ACTION: &str = "Failed to update user";
        self.cache.require(id)?;

        let path = format!("{USERS_PATH}/{id}");
        let value = call(&self.api, ACTION, self.api.put(&path, update)).await?;

        if let Some(user) = decode_item::<User>(value, "user").map_err(schema_error(ACTION))? {
            self.cache.upsert(user.clone());
            return Ok(user);
        }

        self.list().await?;
        Ok(self.cache.require(id)?.clone())
    }

    /// Block an account from signing in.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownEntity` if `id` was not listed, or an
    /// error if the request fails.
    pub async fn block(&mut self, id: UserId) -> Result<User, AdminError> {
        self.set_blocked(id, true).await
    }

    /// Lift a block.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownEntity` if `id` was not listed, or an
    /// error if the request fails.
    pub async fn unblock(&mut self, id: UserId) -> Result<User, AdminError> {
        self.set_blocked(id, false).await
    }

    #[instrument(skip(self), fields(user_id = %id))]
    async fn set_blocked(&mut self, id: UserId, blocked: bool) -> Result<User, AdminError> {
        let (verb, action) = if blocked {
            ("block", "Failed to block user")
        } else {
            ("unblock", "Failed to unblock user")
        };
        self.cache.require(id)?;

        let path = format!("{USERS_PATH}/{id}/{verb}");
        call(&self.api, action, self.api.post_empty(&path)).await?;

        self.cache.patch(id, |user| user.is_blocked = blocked);
        info!(user_id = %id, blocked, "User block state changed");
        Ok(self.cache.require(id)?.clone())
    }

    /// Delete an account.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownEntity` if `id` was not listed, or an
    /// error if the request fails.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete(&mut self, id: UserId) -> Result<(), AdminError> {
        const ACTION: &str = "Failed to delete user";
        self.cache.require(id)?;

        let path = format!("{USERS_PATH}/{id}");
        call(&self.api, ACTION, self.api.delete(&path)).await?;

        self.cache.remove(id);
        info!(user_id = %id, "User deleted");
        Ok(())
    }
}

impl ResourceView for UsersView {
    type Entity = User;

    const NOUN: &'static str = "users";

    fn cache(&self) -> &Collection<User> {
        &self.cache
    }

    fn visible(&self) -> Vec<&User> {
        let role = self.role_filter;
        self.cache
            .filtered(move |user| role.is_none_or(|role| user.role == role))
    }

    fn columns() -> Vec<TableColumn> {
        vec![
            TableColumn::numeric("id", "ID"),
            TableColumn::new("name", "Name"),
            TableColumn::new("email", "Email"),
            TableColumn::new("role", "Role"),
            TableColumn::new("address", "Address"),
            TableColumn::new("status", "Status"),
        ]
    }

    fn row(user: &User) -> Vec<String> {
        vec![
            user.id.to_string(),
            user.full_name.clone(),
            user.email.to_string(),
            user.role.to_string(),
            user.address.clone().unwrap_or_else(|| "-".to_string()),
            if user.is_blocked { "Blocked" } else { "Active" }.to_string(),
        ]
    }
}
