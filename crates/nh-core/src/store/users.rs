use chrono::Utc;

use super::{allocate, remove_where, Store};
use crate::error::{AppError, Result};
use crate::models::{Id, NewUser, User, UserPatch, UserProfile};
use crate::traits::Collection;

impl Store {
    pub fn get_all_users(&self) -> Vec<UserProfile> {
        self.users.iter().map(UserProfile::from).collect()
    }

    pub fn get_user_by_id(&self, id: Id) -> Option<UserProfile> {
        self.users.iter().find(|u| u.id == id).map(UserProfile::from)
    }

    /// The full record, password hash included, for credential checks.
    pub fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.users.iter().find(|u| u.username == username).cloned()
    }

    pub fn create_user(&mut self, new: NewUser) -> Result<UserProfile> {
        if self.users.iter().any(|u| u.username == new.username) {
            return Err(AppError::Conflict(format!(
                "username '{}' already exists",
                new.username
            )));
        }

        let user = User {
            id: allocate(&mut self.counters.next_user_id),
            username: new.username,
            password: new.password,
            role: new.role,
            email: new.email,
            full_name: new.full_name,
            profile_picture: new.profile_picture,
            created_at: Utc::now(),
        };
        let profile = UserProfile::from(&user);
        self.users.push(user);
        self.persist(&[Collection::Users, Collection::Counters]);
        Ok(profile)
    }

    /// `Ok(None)` when no user has `id`.
    pub fn update_user(&mut self, id: Id, patch: UserPatch) -> Result<Option<UserProfile>> {
        if let Some(name) = &patch.username {
            if self.users.iter().any(|u| &u.username == name && u.id != id) {
                return Err(AppError::Conflict(format!("username '{name}' already exists")));
            }
        }

        let Some(user) = self.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        patch.apply(user);
        let profile = UserProfile::from(&*user);
        self.persist(&[Collection::Users]);
        Ok(Some(profile))
    }

    pub fn delete_user(&mut self, id: Id) -> bool {
        let removed = remove_where(&mut self.users, |u| u.id == id);
        if removed {
            self.persist(&[Collection::Users]);
        }
        removed
    }
}
