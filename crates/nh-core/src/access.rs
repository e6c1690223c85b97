//! # Access Policy
//!
//! Role-based permission checks used by the route layer before it calls
//! into the store.

use crate::error::{AppError, Result};
use crate::models::{Id, Role};

/// The authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Id,
    pub role: Role,
}

/// Every guarded operation of the public API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ManageUsers,
    ManageSettings,
    ManageAds,
    ManageLiveStreams,
    ViewSubscribers,
    DeleteChatMessage,
    CreateArticle,
    UploadMedia,
    PostChatMessage,
    ViewStats,
    ListOwnArticles,
    EditArticle { author_id: Id },
    DeleteArticle { author_id: Id },
    DeleteComment { owner: Option<Id> },
}

impl Action {
    fn describe(&self) -> &'static str {
        match self {
            Action::ManageUsers => "manage users",
            Action::ManageSettings => "change site settings",
            Action::ManageAds => "manage ads",
            Action::ManageLiveStreams => "manage live streams",
            Action::ViewSubscribers => "view newsletter subscribers",
            Action::DeleteChatMessage => "delete chat messages",
            Action::CreateArticle => "create articles",
            Action::UploadMedia => "upload media",
            Action::PostChatMessage => "post chat messages",
            Action::ViewStats => "view stats",
            Action::ListOwnArticles => "list own articles",
            Action::EditArticle { .. } => "edit this article",
            Action::DeleteArticle { .. } => "delete this article",
            Action::DeleteComment { .. } => "delete this comment",
        }
    }
}

/// Returns whether `actor` may perform `action`.
pub fn permits(actor: &Actor, action: Action) -> bool {
    use Action::*;

    let staff = matches!(actor.role, Role::Reporter | Role::Superadmin);
    match action {
        ManageUsers | ManageSettings | ManageAds | ManageLiveStreams | ViewSubscribers
        | DeleteChatMessage => actor.role == Role::Superadmin,
        CreateArticle | UploadMedia | PostChatMessage | ViewStats | ListOwnArticles => staff,
        // Reporters may only touch their own articles.
        EditArticle { author_id } | DeleteArticle { author_id } => match actor.role {
            Role::Superadmin => true,
            Role::Reporter => author_id == actor.id,
            Role::User => false,
        },
        DeleteComment { owner } => actor.role == Role::Superadmin || owner == Some(actor.id),
    }
}

/// [`permits`] as a `Result`, for use with `?`.
pub fn authorize(actor: &Actor, action: Action) -> Result<()> {
    if permits(actor, action) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "role '{}' may not {}",
            actor.role,
            action.describe()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN: Actor = Actor { id: 1, role: Role::Superadmin };
    const REPORTER: Actor = Actor { id: 2, role: Role::Reporter };
    const READER: Actor = Actor { id: 3, role: Role::User };

    #[test]
    fn superadmin_only_actions() {
        for action in [Action::ManageUsers, Action::ManageAds, Action::DeleteChatMessage] {
            assert!(permits(&ADMIN, action));
            assert!(!permits(&REPORTER, action));
            assert!(!permits(&READER, action));
        }
    }

    #[test]
    fn staff_actions() {
        assert!(permits(&REPORTER, Action::PostChatMessage));
        assert!(permits(&ADMIN, Action::ViewStats));
        assert!(!permits(&READER, Action::CreateArticle));
    }

    #[test]
    fn reporters_edit_only_their_own_articles() {
        assert!(permits(&REPORTER, Action::EditArticle { author_id: 2 }));
        assert!(!permits(&REPORTER, Action::DeleteArticle { author_id: 9 }));
        assert!(permits(&ADMIN, Action::DeleteArticle { author_id: 9 }));
    }

    #[test]
    fn comment_owner_or_superadmin_may_delete() {
        assert!(permits(&READER, Action::DeleteComment { owner: Some(3) }));
        assert!(!permits(&READER, Action::DeleteComment { owner: None }));
        assert!(permits(&ADMIN, Action::DeleteComment { owner: None }));
    }

    #[test]
    fn authorize_reports_forbidden() {
        let err = authorize(&READER, Action::ManageSettings).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(err.to_string(), "forbidden: role 'user' may not change site settings");
    }
}
