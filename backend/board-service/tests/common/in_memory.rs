//! In-memory repositories and remote collaborators
//!
//! Mirror the PostgreSQL semantics closely enough to drive the services
//! end to end: comment saves bump post activity, a parent must live in the
//! same thread, and the sweep derives activity from comments.

use async_trait::async_trait;
use board_service::clients::{AvatarCatalog, ObjectStorage};
use board_service::db::{CommentRepository, IdentityRepository, PostRepository};
use board_service::error::{AppError, Result};
use board_service::models::{
    CatalogEntry, Comment, Identity, NewComment, NewPost, Post, SessionToken,
};
use board_service::services::archival::last_activity_of;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Default)]
struct BoardState {
    identities: Vec<Identity>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    /// Pinned clock; `None` follows the wall clock
    now: Option<DateTime<Utc>>,
}

impl BoardState {
    fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }
}

/// One store implementing all three repositories
#[derive(Clone, Default)]
pub struct InMemoryBoard {
    state: Arc<Mutex<BoardState>>,
}

impl InMemoryBoard {
    /// Pin the timestamp assigned to subsequent saves
    pub fn set_now(&self, now: DateTime<Utc>) {
        self.state.lock().unwrap().now = Some(now);
    }

    pub fn post(&self, id: Uuid) -> Option<Post> {
        self.state
            .lock()
            .unwrap()
            .posts
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    pub fn post_count(&self) -> usize {
        self.state.lock().unwrap().posts.len()
    }

    pub fn comment_count(&self) -> usize {
        self.state.lock().unwrap().comments.len()
    }
}

#[async_trait]
impl PostRepository for InMemoryBoard {
    async fn save(&self, post: &NewPost) -> Result<Post> {
        let mut state = self.state.lock().unwrap();
        let now = state.now();
        let saved = Post {
            id: Uuid::new_v4(),
            author: post.author.clone(),
            title: post.title.clone(),
            content: post.content.clone(),
            image_refs: post.image_refs.clone(),
            created_at: now,
            last_activity_at: now,
            archived_at: None,
        };
        state.posts.push(saved.clone());
        Ok(saved)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Post> {
        self.post(id)
            .ok_or_else(|| AppError::NotFound(format!("post {}", id)))
    }

    async fn list_active(&self) -> Result<Vec<Post>> {
        let state = self.state.lock().unwrap();
        let mut posts: Vec<Post> = state
            .posts
            .iter()
            .filter(|p| !p.is_archived())
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn list_archived(&self) -> Result<Vec<Post>> {
        let state = self.state.lock().unwrap();
        let mut posts: Vec<Post> = state
            .posts
            .iter()
            .filter(|p| p.is_archived())
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.archived_at.cmp(&a.archived_at));
        Ok(posts)
    }

    async fn archive_stale(&self, cutoff: DateTime<Utc>, now: DateTime<Utc>) -> Result<u64> {
        let mut guard = self.state.lock().unwrap();
        let state = &mut *guard;
        let mut archived = 0;
        for post in state.posts.iter_mut().filter(|p| !p.is_archived()) {
            let comment_times = state
                .comments
                .iter()
                .filter(|c| c.post_id == post.id)
                .map(|c| c.created_at);
            let last = last_activity_of(post.created_at, comment_times).max(post.last_activity_at);
            if last <= cutoff && post.archive(now) {
                archived += 1;
            }
        }
        Ok(archived)
    }
}

#[async_trait]
impl CommentRepository for InMemoryBoard {
    async fn save(&self, comment: &NewComment) -> Result<Comment> {
        let mut guard = self.state.lock().unwrap();
        let state = &mut *guard;
        let now = state.now();

        let post = state
            .posts
            .iter_mut()
            .find(|p| p.id == comment.post_id)
            .ok_or_else(|| AppError::NotFound(format!("post {}", comment.post_id)))?;

        if let Some(parent_id) = comment.parent_id {
            let same_thread = state
                .comments
                .iter()
                .any(|c| c.id == parent_id && c.post_id == comment.post_id);
            if !same_thread {
                return Err(AppError::NotFound(format!("parent comment {}", parent_id)));
            }
        }

        post.last_activity_at = post.last_activity_at.max(now);
        let saved = Comment {
            id: Uuid::new_v4(),
            post_id: comment.post_id,
            parent_id: comment.parent_id,
            author: comment.author.clone(),
            content: comment.content.clone(),
            image_refs: comment.image_refs.clone(),
            created_at: now,
        };
        state.comments.push(saved.clone());
        Ok(saved)
    }

    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let state = self.state.lock().unwrap();
        let mut comments: Vec<Comment> = state
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }
}

#[async_trait]
impl IdentityRepository for InMemoryBoard {
    async fn save(&self, entry: &CatalogEntry) -> Result<SessionToken> {
        let mut state = self.state.lock().unwrap();
        let now = state.now();
        let token = SessionToken::new(Uuid::new_v4().to_string());
        state.identities.push(Identity {
            session_token: token.clone(),
            avatar_url: entry.avatar_url.clone(),
            character_name: entry.name.clone(),
            custom_name: None,
            created_at: now,
            expires_at: Identity::expiry_for(now),
        });
        Ok(token)
    }

    async fn find_by_token(&self, token: &SessionToken) -> Result<Option<Identity>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .identities
            .iter()
            .find(|i| &i.session_token == token)
            .cloned())
    }

    async fn rename(&self, token: &SessionToken, new_name: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let identity = state
            .identities
            .iter_mut()
            .find(|i| &i.session_token == token)
            .ok_or(AppError::UnknownSession)?;
        identity.custom_name = Some(new_name.to_string());
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.state.lock().unwrap().identities.len() as u64)
    }
}

/// Catalog with entries `1..=size`; records every lookup
#[derive(Clone)]
pub struct FakeCatalog {
    size: u32,
    lookups: Arc<Mutex<Vec<u32>>>,
}

impl FakeCatalog {
    pub fn new(size: u32) -> Self {
        Self {
            size,
            lookups: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn lookups(&self) -> Vec<u32> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl AvatarCatalog for FakeCatalog {
    async fn lookup(&self, sequence: u32) -> Result<CatalogEntry> {
        self.lookups.lock().unwrap().push(sequence);
        if sequence == 0 || sequence > self.size {
            return Err(AppError::AvatarUnavailable(format!(
                "no character {}",
                sequence
            )));
        }
        Ok(CatalogEntry {
            name: format!("Character {}", sequence),
            avatar_url: format!("https://catalog.test/avatar/{}.jpeg", sequence),
        })
    }
}

/// Object store keeping uploads in memory
#[derive(Clone, Default)]
pub struct FakeStorage {
    objects: Arc<Mutex<HashMap<String, (Vec<u8>, String)>>>,
}

impl FakeStorage {
    pub fn object(&self, url: &str) -> Option<(Vec<u8>, String)> {
        self.objects.lock().unwrap().get(url).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl ObjectStorage for FakeStorage {
    async fn ensure_bucket(&self, _bucket: &str) -> Result<()> {
        Ok(())
    }

    async fn put(&self, bucket: &str, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        let mut objects = self.objects.lock().unwrap();
        let url = format!("http://storage.test/{}/{}", bucket, objects.len() + 1);
        objects.insert(url.clone(), (bytes, content_type.to_string()));
        Ok(url)
    }
}
