use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub followers: Vec<String>,
    pub following: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_following(&self, user_id: &str) -> bool {
        self.following.iter().any(|id| id == user_id)
    }
}

/// Flips the follow edge from `current` to `target` on both documents and
/// returns whether `current` now follows `target`. The caller is responsible
/// for rejecting self-follows before loading the two documents.
pub fn toggle_follow(current: &mut User, target: &mut User) -> bool {
    if current.is_following(&target.id) {
        current.following.retain(|id| id != &target.id);
        target.followers.retain(|id| id != &current.id);
        false
    } else {
        current.following.push(target.id.clone());
        target.followers.push(current.id.clone());
        true
    }
}

// Username fields below are copies taken at write time and are never
// refreshed from the user document.

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub user_id: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Post {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub content: String,
    pub image_url: String,
    pub likes: Vec<Like>,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn new(user_id: &str, username: &str, content: String, image_url: String) -> Self {
        Post {
            id: new_id(),
            user_id: user_id.to_string(),
            username: username.to_string(),
            content,
            image_url,
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.likes.iter().any(|like| like.user_id == user_id)
    }

    /// Removes the first like by `user_id` if there is one, otherwise appends
    /// a new like. Returns whether the post is liked by `user_id` afterwards.
    pub fn toggle_like(&mut self, user_id: &str, username: &str) -> bool {
        match self.likes.iter().position(|like| like.user_id == user_id) {
            Some(index) => {
                self.likes.remove(index);
                false
            }
            None => {
                self.likes.push(Like {
                    user_id: user_id.to_string(),
                    username: username.to_string(),
                });
                true
            }
        }
    }

    pub fn add_comment(&mut self, user_id: &str, username: &str, text: String) -> &Comment {
        self.comments.push(Comment {
            id: new_id(),
            user_id: user_id.to_string(),
            username: username.to_string(),
            text,
            created_at: Utc::now(),
        });
        &self.comments[self.comments.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> User {
        User {
            id: new_id(),
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password: String::new(),
            followers: Vec::new(),
            following: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn like_toggle_is_its_own_inverse() {
        let mut post = Post::new("author", "alice", "hello".into(), String::new());
        post.toggle_like("someone", "carol");
        let before = post.likes.clone();

        assert!(post.toggle_like("u2", "bob"));
        assert_eq!(post.likes.len(), 2);
        assert!(post.is_liked_by("u2"));

        assert!(!post.toggle_like("u2", "bob"));
        assert_eq!(post.likes, before);
        assert!(!post.is_liked_by("u2"));
    }

    #[test]
    fn unlike_only_removes_one_entry() {
        let mut post = Post::new("author", "alice", "hello".into(), String::new());
        let dup = Like {
            user_id: "u2".into(),
            username: "bob".into(),
        };
        post.likes = vec![dup.clone(), dup.clone()];
        assert!(!post.toggle_like("u2", "bob"));
        assert_eq!(post.likes, vec![dup]);
    }

    #[test]
    fn like_keeps_username_snapshot() {
        let mut post = Post::new("author", "alice", "hello".into(), String::new());
        post.toggle_like("u2", "bob");
        assert_eq!(post.likes[0].username, "bob");
    }

    #[test]
    fn comments_are_appended_in_order() {
        let mut post = Post::new("author", "alice", String::new(), "https://img".into());
        post.add_comment("u2", "bob", "first".into());
        let second = post.add_comment("u3", "carol", "   ".into()).clone();
        assert_eq!(post.comments.len(), 2);
        assert_eq!(post.comments[0].text, "first");
        assert_eq!(second.text, "   ");
        assert_ne!(post.comments[0].id, post.comments[1].id);
    }

    #[test]
    fn follow_toggle_updates_both_sides_and_reverts() {
        let mut alice = user("alice");
        let mut bob = user("bob");

        assert!(toggle_follow(&mut bob, &mut alice));
        assert!(bob.is_following(&alice.id));
        assert_eq!(alice.followers, vec![bob.id.clone()]);
        assert!(alice.following.is_empty());

        assert!(!toggle_follow(&mut bob, &mut alice));
        assert!(bob.following.is_empty());
        assert!(alice.followers.is_empty());
    }
}
