//! Story records and the store that owns them

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A generated story and its optional narration artifact.
///
/// `audio_path` is the only field ever mutated, and only through
/// [`StoryStore::attach_audio`]. Everything else is fixed at creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    /// Unique id assigned at creation
    pub id: String,
    /// Id of the upload this story was generated from, when the caller sent one
    pub image_id: Option<String>,
    /// On-disk path of the uploaded image
    pub image_path: String,
    /// Generated (or canned) text
    pub content: String,
    /// Caller-supplied story type, stored verbatim
    #[serde(rename = "type")]
    pub story_type: String,
    /// Creation timestamp
    pub generated_at: DateTime<Utc>,
    /// Path of the narration artifact, attached after the fact
    pub audio_path: Option<String>,
}

/// Storage for story records.
///
/// Call sites only see this trait so a durable backend can replace the
/// in-memory map without touching them.
#[async_trait]
pub trait StoryStore: Send + Sync + std::fmt::Debug {
    /// Fetches a story by id.
    async fn get(&self, id: &str) -> Option<Story>;

    /// Inserts or replaces a story.
    async fn put(&self, story: Story);

    /// Returns true when the id is present.
    async fn has(&self, id: &str) -> bool;

    /// Sets `audio_path` on an existing story, returning false for unknown
    /// ids. Concurrent writers race and the last one wins.
    async fn attach_audio(&self, id: &str, audio_path: &str) -> bool;
}

/// Process-lifetime map of story id to record. Lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStoryStore {
    stories: RwLock<HashMap<String, Story>>,
}

impl MemoryStoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoryStore for MemoryStoryStore {
    async fn get(&self, id: &str) -> Option<Story> {
        self.stories.read().await.get(id).cloned()
    }

    async fn put(&self, story: Story) {
        self.stories.write().await.insert(story.id.clone(), story);
    }

    async fn has(&self, id: &str) -> bool {
        self.stories.read().await.contains_key(id)
    }

    async fn attach_audio(&self, id: &str, audio_path: &str) -> bool {
        match self.stories.write().await.get_mut(id) {
            Some(story) => {
                story.audio_path = Some(audio_path.to_string());
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(id: &str) -> Story {
        Story {
            id: id.to_string(),
            image_id: Some("image-1".to_string()),
            image_path: "./uploads/image-1.png".to_string(),
            content: "A story".to_string(),
            story_type: "story".to_string(),
            generated_at: Utc::now(),
            audio_path: None,
        }
    }

    #[tokio::test]
    async fn put_get_has_roundtrip() {
        let store = MemoryStoryStore::new();
        assert!(!store.has("s1").await);
        assert!(store.get("s1").await.is_none());

        store.put(story("s1")).await;
        assert!(store.has("s1").await);
        let fetched = store.get("s1").await.expect("story present");
        assert_eq!(fetched.content, "A story");
        assert!(fetched.audio_path.is_none());
    }

    #[tokio::test]
    async fn reads_do_not_mutate() {
        let store = MemoryStoryStore::new();
        store.put(story("s1")).await;
        let first = store.get("s1").await.expect("story present");
        let second = store.get("s1").await.expect("story present");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn attach_audio_unknown_id_is_a_noop() {
        let store = MemoryStoryStore::new();
        assert!(!store.attach_audio("missing", "./generated/a.wav").await);
    }

    #[tokio::test]
    async fn attach_audio_last_writer_wins() {
        let store = MemoryStoryStore::new();
        store.put(story("s1")).await;

        assert!(store.attach_audio("s1", "./generated/first.wav").await);
        assert!(store.attach_audio("s1", "./generated/second.wav").await);

        let fetched = store.get("s1").await.expect("story present");
        assert_eq!(
            fetched.audio_path.as_deref(),
            Some("./generated/second.wav")
        );
    }
}
