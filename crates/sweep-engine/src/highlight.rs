//! Highlight feed curation.
//!
//! The feed is an ordered list of folders: the stale-screenshot folder
//! first when non-empty, then interest folders in the user's saved
//! prompt order, then the remaining global prompts. Photos the user has
//! already acted on never reappear.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Months, Utc};
use serde::Serialize;

use sweep_core::action::HighlightActionKind;
use sweep_settings::types::SweepSettings;
use sweep_store::records::{HighlightAction, PhotoRecord};
use sweep_store::repos::{HighlightRepo, PhotoRepo, PreferencesRepo};
use sweep_store::PartitionStore;

use crate::errors::{EngineError, Result};

/// Distinguished folder name for screenshots past the staleness cutoff.
pub const STALE_SCREENSHOT_FOLDER: &str = "6개월 지난 스크린샷";

/// Global interest categories, in presentation order.
///
/// These are the user-facing prompt names; matching against a photo is by
/// the category name appearing literally in `contentTags`, never by an
/// expanded keyword list.
pub const PROMPT_CATEGORIES: [&str; 6] = ["음식", "동물", "풍경", "사람", "여행", "셀카"];

/// Every prompt category name, in presentation order. This is the
/// selection list shown before the user has saved any preferences.
#[must_use]
pub fn initial_prompts() -> Vec<&'static str> {
    PROMPT_CATEGORIES.to_vec()
}

/// One folder in the highlight feed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightFolder {
    /// Folder name: a prompt category or [`STALE_SCREENSHOT_FOLDER`].
    pub folder: String,
    /// Matching photo ids, library order.
    pub photo_ids: Vec<String>,
}

/// Builds the highlight feed for a user.
pub struct HighlightCurator {
    photos: PhotoRepo,
    actions: HighlightRepo,
    prefs: PreferencesRepo,
    stale_months: u32,
}

impl HighlightCurator {
    /// Build a curator over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn PartitionStore>, settings: &SweepSettings) -> Self {
        Self {
            photos: PhotoRepo::new(store.clone()),
            actions: HighlightRepo::new(store.clone()),
            prefs: PreferencesRepo::new(store),
            stale_months: settings.highlight.stale_screenshot_months,
        }
    }

    /// The ordered highlight folders with their matching photo ids.
    ///
    /// Folders with no remaining photos are omitted entirely.
    pub async fn folders(&self, user_id: &str) -> Result<Vec<HighlightFolder>> {
        let photos = self.fetch_photos(user_id).await?;
        let acted = self.fetch_acted(user_id).await?;
        let cutoff = self.stale_cutoff(Utc::now());

        let mut folders = Vec::new();

        let stale: Vec<String> = photos
            .iter()
            .filter(|photo| is_stale_screenshot(photo, cutoff) && !acted.contains(&photo.photo_id))
            .map(|photo| photo.photo_id.clone())
            .collect();
        if !stale.is_empty() {
            folders.push(HighlightFolder {
                folder: STALE_SCREENSHOT_FOLDER.to_owned(),
                photo_ids: stale,
            });
        }

        for prompt in self.candidate_prompts(user_id).await? {
            let matched: Vec<String> = photos
                .iter()
                .filter(|photo| {
                    matches_prompt(photo, &prompt) && !acted.contains(&photo.photo_id)
                })
                .map(|photo| photo.photo_id.clone())
                .collect();
            if !matched.is_empty() {
                folders.push(HighlightFolder {
                    folder: prompt,
                    photo_ids: matched,
                });
            }
        }

        Ok(folders)
    }

    /// Photos for one highlight folder, with acted-upon photos excluded.
    pub async fn photos_for_folder(
        &self,
        user_id: &str,
        folder: &str,
    ) -> Result<Vec<PhotoRecord>> {
        let photos = self.fetch_photos(user_id).await?;
        let acted = self.fetch_acted(user_id).await?;
        let cutoff = self.stale_cutoff(Utc::now());

        Ok(photos
            .into_iter()
            .filter(|photo| !acted.contains(&photo.photo_id))
            .filter(|photo| {
                if folder == STALE_SCREENSHOT_FOLDER {
                    is_stale_screenshot(photo, cutoff)
                } else {
                    matches_prompt(photo, folder)
                }
            })
            .collect())
    }

    /// Record one swipe decision. The latest action for a photo wins.
    pub async fn record_action(
        &self,
        user_id: &str,
        photo_id: &str,
        action: HighlightActionKind,
    ) -> Result<()> {
        let record = HighlightAction {
            user_id: user_id.to_owned(),
            photo_id: photo_id.to_owned(),
            action,
            timestamp: Utc::now(),
        };
        self.actions
            .record_action(record)
            .await
            .map_err(|err| EngineError::store("record_action", user_id, err))
    }

    /// Every recorded swipe decision for the user.
    pub async fn history(&self, user_id: &str) -> Result<Vec<HighlightAction>> {
        self.actions
            .history(user_id)
            .await
            .map_err(|err| EngineError::store("history", user_id, err))
    }

    /// Saved prompts first in their saved order, then the remaining
    /// global prompt categories, each exactly once.
    async fn candidate_prompts(&self, user_id: &str) -> Result<Vec<String>> {
        let saved = self
            .prefs
            .prompt_tags(user_id)
            .await
            .map_err(|err| EngineError::store("candidate_prompts", user_id, err))?;

        let mut prompts = saved;
        for name in initial_prompts() {
            if !prompts.iter().any(|p| p == name) {
                prompts.push(name.to_owned());
            }
        }
        Ok(prompts)
    }

    fn stale_cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_months(Months::new(self.stale_months))
            .unwrap_or(now)
    }

    async fn fetch_photos(&self, user_id: &str) -> Result<Vec<PhotoRecord>> {
        self.photos
            .fetch_all(user_id)
            .await
            .map_err(|err| EngineError::store("highlight_photos", user_id, err))
    }

    async fn fetch_acted(&self, user_id: &str) -> Result<HashSet<String>> {
        self.actions
            .acted_photo_ids(user_id)
            .await
            .map_err(|err| EngineError::store("highlight_actions", user_id, err))
    }
}

fn is_stale_screenshot(photo: &PhotoRecord, cutoff: DateTime<Utc>) -> bool {
    photo.tags.is_screenshot() && photo.timestamp < cutoff
}

/// Case-insensitive, trimmed match of a photo's content tags against a
/// folder name. Only the name itself counts; a raw analyzer keyword like
/// `dog` never places a photo in `동물`.
fn matches_prompt(photo: &PhotoRecord, prompt: &str) -> bool {
    let prompt = prompt.trim();
    photo
        .content_tags
        .iter()
        .any(|tag| tag.trim().eq_ignore_ascii_case(prompt))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
