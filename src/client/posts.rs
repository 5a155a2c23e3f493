//! Post slice of the client cache: the global feed and the viewed profile's posts.

use uuid::Uuid;

use super::Status;
use crate::models::post::PostResponse;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostSlice {
    /// Global feed, in server order (newest first).
    pub posts: Vec<PostResponse>,
    /// Posts of the profile currently being viewed.
    pub user_posts: Vec<PostResponse>,
    pub status: Status,
}

impl PostSlice {
    pub fn set_posts(&mut self, posts: Vec<PostResponse>) {
        self.posts = posts;
    }

    pub fn set_user_posts(&mut self, posts: Vec<PostResponse>) {
        self.user_posts = posts;
    }

    /// New posts go to the feed only, even when the viewed profile is the author.
    pub fn prepend_post(&mut self, post: PostResponse) {
        self.posts.insert(0, post);
    }

    pub fn remove_post(&mut self, post_id: Uuid) {
        self.posts.retain(|p| p.id != post_id);
        self.user_posts.retain(|p| p.id != post_id);
    }

    /// Applies a like/unlike result to every cached copy of the post.
    pub fn replace_likes(&mut self, post_id: Uuid, likes: &[Uuid]) {
        for post in self
            .posts
            .iter_mut()
            .chain(self.user_posts.iter_mut())
            .filter(|p| p.id == post_id)
        {
            post.likes = likes.to_vec();
        }
    }

    pub fn find(&self, post_id: Uuid) -> Option<&PostResponse> {
        self.posts.iter().find(|p| p.id == post_id)
    }
}
