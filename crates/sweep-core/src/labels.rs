//! Folder label vocabulary and the ordered label set.
//!
//! A photo belongs to zero or more organizational folders. The storage
//! layer persists the membership as a single comma-joined string, so
//! everything above that boundary works with [`LabelSet`] — an ordered,
//! deduplicated set of label strings — and joins/splits exactly once.

use std::fmt;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// FolderLabel
// ─────────────────────────────────────────────────────────────────────────────

/// Rule-derived folder labels the classification engine can produce.
///
/// Display names are the user-facing Korean strings persisted in the
/// `folder` field; they are part of the wire contract and must not change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FolderLabel {
    /// Exact-duplicate cluster member (`d`-prefixed group).
    Duplicate,
    /// Near-duplicate cluster member (`s`-prefixed group).
    Similar,
    /// Blur detector fired (`tags.blurry == 1`).
    Blurry,
    /// Filename matched the screenshot pattern.
    Screenshot,
    /// Quality score crossed the delete-recommendation threshold.
    DeleteRecommended,
    /// Catch-all for photos no rule matched.
    Other,
}

impl FolderLabel {
    /// The persisted folder-name string for this label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Duplicate => "완전 중복",
            Self::Similar => "유사한 사진",
            Self::Blurry => "흐릿한 사진",
            Self::Screenshot => "스크린샷",
            Self::DeleteRecommended => "삭제 추천",
            Self::Other => "기타",
        }
    }

    /// Fixed priority sequence used by the folder aggregator.
    ///
    /// Folders matching this sequence sort first, in this order; everything
    /// else sorts alphabetically after them. `기타` is deliberately absent —
    /// it competes with user-visible interest folders alphabetically.
    pub const SUMMARY_PRIORITY: [Self; 5] = [
        Self::Duplicate,
        Self::Similar,
        Self::Blurry,
        Self::DeleteRecommended,
        Self::Screenshot,
    ];

    /// Rank of a folder name in the summary priority sequence.
    #[must_use]
    pub fn priority_rank(name: &str) -> Option<usize> {
        Self::SUMMARY_PRIORITY
            .iter()
            .position(|label| label.as_str() == name)
    }
}

impl fmt::Display for FolderLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// LabelSet
// ─────────────────────────────────────────────────────────────────────────────

/// Ordered, deduplicated set of folder-label strings.
///
/// Append order is the classification rule order and is part of the
/// observable contract: consumers split the joined string and rely on the
/// sequence being stable. [`LabelSet::join`] and [`LabelSet::split`] are the
/// only places the comma encoding appears.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    /// Create an empty label set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule label, ignoring duplicates.
    pub fn push(&mut self, label: FolderLabel) {
        self.push_name(label.as_str());
    }

    /// Append a raw folder name, ignoring duplicates.
    pub fn push_name(&mut self, name: &str) {
        if !self.labels.iter().any(|l| l == name) {
            self.labels.push(name.to_owned());
        }
    }

    /// Whether the set contains the given label.
    #[must_use]
    pub fn contains(&self, label: FolderLabel) -> bool {
        self.contains_name(label.as_str())
    }

    /// Whether the set contains the given folder name.
    #[must_use]
    pub fn contains_name(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l == name)
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of labels in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Labels in append order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }

    /// Join to the persisted comma-delimited form.
    ///
    /// An empty set joins to the empty string — the single-photo query path
    /// substitutes `기타`, the batch-save path persists it as-is.
    #[must_use]
    pub fn join(&self) -> String {
        self.labels.join(",")
    }

    /// Split a persisted folder string back into a set.
    ///
    /// The empty string yields an empty set, not one empty label.
    #[must_use]
    pub fn split(folder: &str) -> Self {
        let labels = folder
            .split(',')
            .filter(|part| !part.is_empty())
            .map(ToOwned::to_owned)
            .collect();
        Self { labels }
    }

    /// Join, substituting `기타` for an empty set.
    #[must_use]
    pub fn join_or_other(&self) -> String {
        if self.labels.is_empty() {
            FolderLabel::Other.as_str().to_owned()
        } else {
            self.join()
        }
    }
}

impl From<FolderLabel> for LabelSet {
    fn from(label: FolderLabel) -> Self {
        let mut set = Self::new();
        set.push(label);
        set
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Group identifiers
// ─────────────────────────────────────────────────────────────────────────────

/// Cluster kind encoded in a group ID prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupKind {
    /// Exact-duplicate cluster (`d` prefix).
    Duplicate,
    /// Near-duplicate cluster (`s` prefix).
    Similar,
}

/// Classify a group ID by its prefix, if recognized.
#[must_use]
pub fn group_kind(group_id: &str) -> Option<GroupKind> {
    if group_id.starts_with('d') {
        Some(GroupKind::Duplicate)
    } else if group_id.starts_with('s') {
        Some(GroupKind::Similar)
    } else {
        None
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // -- FolderLabel --

    #[test]
    fn label_display_names() {
        assert_eq!(FolderLabel::Duplicate.as_str(), "완전 중복");
        assert_eq!(FolderLabel::Similar.as_str(), "유사한 사진");
        assert_eq!(FolderLabel::Blurry.as_str(), "흐릿한 사진");
        assert_eq!(FolderLabel::Screenshot.as_str(), "스크린샷");
        assert_eq!(FolderLabel::DeleteRecommended.as_str(), "삭제 추천");
        assert_eq!(FolderLabel::Other.as_str(), "기타");
    }

    #[test]
    fn priority_rank_matches_sequence() {
        assert_eq!(FolderLabel::priority_rank("완전 중복"), Some(0));
        assert_eq!(FolderLabel::priority_rank("유사한 사진"), Some(1));
        assert_eq!(FolderLabel::priority_rank("흐릿한 사진"), Some(2));
        assert_eq!(FolderLabel::priority_rank("삭제 추천"), Some(3));
        assert_eq!(FolderLabel::priority_rank("스크린샷"), Some(4));
        assert_eq!(FolderLabel::priority_rank("기타"), None);
        assert_eq!(FolderLabel::priority_rank("여행"), None);
    }

    // -- LabelSet --

    #[test]
    fn label_set_preserves_append_order() {
        let mut set = LabelSet::new();
        set.push(FolderLabel::Similar);
        set.push(FolderLabel::Blurry);
        set.push(FolderLabel::Screenshot);
        assert_eq!(set.join(), "유사한 사진,흐릿한 사진,스크린샷");
    }

    #[test]
    fn label_set_dedupes() {
        let mut set = LabelSet::new();
        set.push(FolderLabel::Blurry);
        set.push(FolderLabel::Blurry);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn empty_set_joins_to_empty_string() {
        assert_eq!(LabelSet::new().join(), "");
        assert_eq!(LabelSet::new().join_or_other(), "기타");
    }

    #[test]
    fn split_round_trips() {
        let set = LabelSet::split("유사한 사진,스크린샷");
        assert_eq!(set.len(), 2);
        assert!(set.contains(FolderLabel::Similar));
        assert!(set.contains(FolderLabel::Screenshot));
        assert_eq!(set.join(), "유사한 사진,스크린샷");
    }

    #[test]
    fn split_empty_string_is_empty_set() {
        let set = LabelSet::split("");
        assert!(set.is_empty());
    }

    // -- group_kind --

    #[test]
    fn group_kind_prefixes() {
        assert_eq!(group_kind("d-123"), Some(GroupKind::Duplicate));
        assert_eq!(group_kind("s-456"), Some(GroupKind::Similar));
        assert_eq!(group_kind("x-789"), None);
        assert_eq!(group_kind(""), None);
    }
}
