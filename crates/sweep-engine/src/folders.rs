//! Folder aggregation over a user's persisted photo set.
//!
//! Grouping splits the comma-joined `folder` field, so a multi-label
//! photo counts toward every folder it lists. Ordering puts the fixed
//! priority folders first and everything else alphabetically after them.

use serde::Serialize;

use sweep_core::labels::FolderLabel;
use sweep_core::savings::RECLAIM_MB_PER_PHOTO;
use sweep_store::records::PhotoRecord;

/// One folder entry in the summary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderEntry {
    /// User-facing folder name.
    pub folder_name: String,
    /// Number of photos in the folder.
    pub count: usize,
    /// Thumbnail reference for the folder's first photo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// The folder summary for one user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderSummary {
    /// Total photos across the user's library.
    pub total_photos: usize,
    /// Estimated reclaimable storage, e.g. `"0.1GB"`.
    pub saved_storage: String,
    /// Folders in priority-then-alphabetical order.
    pub folders: Vec<FolderEntry>,
}

/// Group `photos` into ordered folder entries with a storage estimate.
///
/// A photo with an empty `folder` field counts toward `기타`. The
/// estimate attributes [`RECLAIM_MB_PER_PHOTO`] megabytes to every photo
/// under the delete-recommended folder, reported in gigabytes with one
/// decimal place.
#[must_use]
pub fn summarize(photos: &[PhotoRecord], thumbnail_base_url: &str) -> FolderSummary {
    // (name, count, first photo id), insertion order; sorted below.
    let mut groups: Vec<(String, usize, String)> = Vec::new();
    for photo in photos {
        let labels = photo.labels();
        let names: Vec<String> = if labels.is_empty() {
            vec![FolderLabel::Other.as_str().to_owned()]
        } else {
            labels.as_slice().to_vec()
        };
        for name in names {
            match groups.iter_mut().find(|(n, _, _)| *n == name) {
                Some((_, count, _)) => *count += 1,
                None => groups.push((name, 1, photo.photo_id.clone())),
            }
        }
    }

    groups.sort_by(|(a, _, _), (b, _, _)| {
        let rank_a = FolderLabel::priority_rank(a);
        let rank_b = FolderLabel::priority_rank(b);
        match (rank_a, rank_b) {
            (Some(ra), Some(rb)) => ra.cmp(&rb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.cmp(b),
        }
    });

    let delete_recommended = groups
        .iter()
        .find(|(name, _, _)| name == FolderLabel::DeleteRecommended.as_str())
        .map_or(0, |(_, count, _)| *count);
    #[allow(clippy::cast_precision_loss)]
    let saved_gb = (delete_recommended as f64 * RECLAIM_MB_PER_PHOTO as f64) / 1024.0;
    let saved_storage = format!("{saved_gb:.1}GB");

    let folders = groups
        .into_iter()
        .map(|(folder_name, count, first_photo_id)| FolderEntry {
            folder_name,
            count,
            thumbnail: Some(thumbnail_ref(thumbnail_base_url, &first_photo_id)),
        })
        .collect();

    FolderSummary {
        total_photos: photos.len(),
        saved_storage,
        folders,
    }
}

/// Photos whose label list contains `folder_name`. An empty `folder`
/// field matches only `기타`.
#[must_use]
pub fn photos_in_folder<'a>(
    photos: &'a [PhotoRecord],
    folder_name: &str,
) -> Vec<&'a PhotoRecord> {
    photos
        .iter()
        .filter(|photo| {
            if photo.folder.is_empty() {
                folder_name == FolderLabel::Other.as_str()
            } else {
                photo.in_folder(folder_name)
            }
        })
        .collect()
}

/// CDN reference for a photo's thumbnail.
#[must_use]
pub fn thumbnail_ref(base_url: &str, photo_id: &str) -> String {
    format!("{}/{photo_id}", base_url.trim_end_matches('/'))
}

// ─────────────────────────────────────────────────────────────────────────────
// Screenshot subfolders
// ─────────────────────────────────────────────────────────────────────────────

/// Screenshot subcategories in presentation order, with the sourceApp /
/// content-tag keywords that place a screenshot there.
pub const SCREENSHOT_CATEGORIES: [(&str, &[&str]); 7] = [
    ("메신저 캡처", &["kakaotalk", "line", "whatsapp", "messenger"]),
    ("상품 캡처", &["coupang", "gmarket", "11st", "쇼핑", "shop"]),
    ("기프티콘", &["giftishow", "happycon", "기프티콘", "선물"]),
    ("지도 캡처", &["kakaomap", "navermap", "tmap", "지도", "map"]),
    ("정보 검색", &["chrome", "safari", "naver", "뉴스", "검색", "정보"]),
    ("QR/바코드", &["barcode", "qr", "코드", "입장권"]),
    ("인물 캡처", &["camera", "face", "사람", "셀카", "인물"]),
];

/// One screenshot subcategory and its member photo ids.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotSubfolder {
    /// Subcategory name.
    pub folder: String,
    /// Member photo ids, library order.
    pub photo_ids: Vec<String>,
}

/// Bucket the user's screenshots into fixed subcategories.
///
/// A screenshot lands in the first category whose keyword list matches
/// its lowercased `sourceApp` (substring) or content tags (exact);
/// unmatched screenshots fall into a trailing `기타` bucket. Every
/// category is present in the output, empty or not.
#[must_use]
pub fn screenshot_subfolders(photos: &[PhotoRecord]) -> Vec<ScreenshotSubfolder> {
    let mut buckets: Vec<ScreenshotSubfolder> = SCREENSHOT_CATEGORIES
        .iter()
        .map(|(name, _)| ScreenshotSubfolder {
            folder: (*name).to_owned(),
            photo_ids: Vec::new(),
        })
        .collect();
    buckets.push(ScreenshotSubfolder {
        folder: FolderLabel::Other.as_str().to_owned(),
        photo_ids: Vec::new(),
    });

    for photo in photos {
        if !photo.in_folder(FolderLabel::Screenshot.as_str()) {
            continue;
        }
        let app = photo
            .source_app
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();
        let tags: Vec<String> = photo
            .content_tags
            .iter()
            .map(|tag| tag.to_lowercase())
            .collect();

        let slot = SCREENSHOT_CATEGORIES
            .iter()
            .position(|(_, keywords)| {
                keywords
                    .iter()
                    .any(|k| app.contains(k) || tags.iter().any(|tag| tag == k))
            })
            .unwrap_or(SCREENSHOT_CATEGORIES.len());
        buckets[slot].photo_ids.push(photo.photo_id.clone());
    }

    buckets
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
