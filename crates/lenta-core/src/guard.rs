//! Authorization guard - ownership and follow rules as explicit decisions.
//!
//! The routing layer consumes tagged results instead of scattering ownership
//! checks through handlers. A non-author edit attempt is a silent redirect to
//! the post detail page, never a 403.

use uuid::Uuid;

use crate::domain::Post;

/// Outcome of an edit authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAccess {
    Allowed,
    /// Authenticated but not the author: send back to the detail page.
    RedirectToDetail,
}

/// True iff the viewer owns the post.
pub fn can_edit(viewer: Uuid, post: &Post) -> bool {
    viewer == post.author_id
}

/// Decide what an authenticated viewer may do with an edit request.
pub fn edit_access(viewer: Uuid, post: &Post) -> EditAccess {
    if can_edit(viewer, post) {
        EditAccess::Allowed
    } else {
        EditAccess::RedirectToDetail
    }
}

/// Self-follow is rejected; also keeps the "following" UI flag honest on a
/// user's own profile.
pub fn can_follow(user: Uuid, author: Uuid) -> bool {
    user != author
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn post_by(author_id: Uuid) -> Post {
        Post {
            id: 1,
            author_id,
            text: "text".to_string(),
            pub_date: Utc::now(),
            group_id: None,
            image: None,
        }
    }

    #[test]
    fn author_may_edit_own_post() {
        let author = Uuid::new_v4();
        let post = post_by(author);
        assert!(can_edit(author, &post));
        assert_eq!(edit_access(author, &post), EditAccess::Allowed);
    }

    #[test]
    fn non_author_is_redirected_to_detail() {
        let post = post_by(Uuid::new_v4());
        let stranger = Uuid::new_v4();
        assert!(!can_edit(stranger, &post));
        assert_eq!(edit_access(stranger, &post), EditAccess::RedirectToDetail);
    }

    #[test]
    fn self_follow_is_rejected() {
        let user = Uuid::new_v4();
        assert!(!can_follow(user, user));
        assert!(can_follow(user, Uuid::new_v4()));
    }
}
