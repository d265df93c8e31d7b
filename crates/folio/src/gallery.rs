//! The home screen's photo gallery.
//!
//! Photos come from the device's image library through an [`ImagePicker`];
//! the gallery only keeps the URIs the picker hands back, in pick order.
//! Nothing is uploaded or persisted: the gallery lives as long as the home
//! screen does.

use std::future::Future;

use folio_directory::User;
use serde::{Deserialize, Serialize};

/// Number of photos per row on the home screen.
pub const GRID_COLUMNS: usize = 3;

/// What the home screen shows while the gallery is empty.
pub const PLACEHOLDER: &str = "No photos selected yet";

/// The home screen's title for `user`.
pub fn greeting(user: &User) -> String {
    format!("Welcome {}", user.name)
}

// ---------------------------------------------------------------------------
// Picker contract
// ---------------------------------------------------------------------------

/// Kind of media to offer in the picker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Photo,
    Video,
    Mixed,
}

/// Options passed to the picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickerOptions {
    pub media_type: MediaType,

    /// Maximum number of items the user may select; `0` means no limit.
    pub selection_limit: u32,

    pub include_base64: bool,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            media_type: MediaType::Photo,
            selection_limit: 0,
            include_base64: false,
        }
    }
}

/// One selected item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickedAsset {
    pub uri: String,
}

/// What the picker reports once the user is done.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickerResponse {
    #[serde(default)]
    pub did_cancel: bool,

    #[serde(default)]
    pub error_code: Option<String>,

    #[serde(default)]
    pub assets: Option<Vec<PickedAsset>>,
}

impl PickerResponse {
    /// A response carrying the given URIs.
    pub fn with_uris<I, U>(uris: I) -> Self
    where
        I: IntoIterator<Item = U>,
        U: Into<String>,
    {
        Self {
            assets: Some(
                uris.into_iter()
                    .map(|uri| PickedAsset { uri: uri.into() })
                    .collect(),
            ),
            ..Self::default()
        }
    }

    /// A response for a dismissed picker.
    pub fn cancelled() -> Self {
        Self {
            did_cancel: true,
            ..Self::default()
        }
    }
}

/// The device's image library.
pub trait ImagePicker: Send + Sync {
    /// Opens the picker and resolves once the user has chosen or
    /// dismissed it.
    fn pick(
        &self,
        options: &PickerOptions,
    ) -> impl Future<Output = PickerResponse> + Send;
}

// ---------------------------------------------------------------------------
// Gallery
// ---------------------------------------------------------------------------

/// The photos picked so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Gallery {
    photos: Vec<String>,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the URIs from a picker response and returns how many were
    /// added.
    ///
    /// A cancelled picker, an error code, or a response without assets
    /// adds nothing.
    pub fn extend(&mut self, response: PickerResponse) -> usize {
        if response.did_cancel {
            return 0;
        }
        if let Some(code) = &response.error_code {
            tracing::warn!(%code, "image picker failed");
            return 0;
        }
        let Some(assets) = response.assets else {
            return 0;
        };

        let added = assets.len();
        self.photos.extend(assets.into_iter().map(|asset| asset.uri));
        tracing::debug!(added, total = self.photos.len(), "photos picked");
        added
    }

    /// Opens `picker` with the home screen's options and keeps whatever
    /// the user selects.
    pub async fn pick_from<P: ImagePicker>(&mut self, picker: &P) -> usize {
        let response = picker.pick(&PickerOptions::default()).await;
        self.extend(response)
    }

    /// Drops every photo.
    pub fn clear(&mut self) {
        self.photos.clear();
    }

    pub fn photos(&self) -> &[String] {
        &self.photos
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// The photos laid out in rows of [`GRID_COLUMNS`]; the last row may
    /// be short.
    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.photos.chunks(GRID_COLUMNS)
    }

    /// The empty-gallery text, or `None` once there's something to show.
    pub fn placeholder(&self) -> Option<&'static str> {
        self.is_empty().then_some(PLACEHOLDER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_directory::UserId;

    #[test]
    fn test_greeting_uses_display_name() {
        let user = User::new(UserId::Number(1), "a@x.com").with_name("Ann");

        assert_eq!(greeting(&user), "Welcome Ann");
    }

    #[test]
    fn test_extend_appends_in_order() {
        let mut gallery = Gallery::new();
        gallery.extend(PickerResponse::with_uris(["file:///1.jpg"]));

        let added = gallery.extend(PickerResponse::with_uris([
            "file:///2.jpg",
            "file:///3.jpg",
        ]));

        assert_eq!(added, 2);
        assert_eq!(
            gallery.photos(),
            ["file:///1.jpg", "file:///2.jpg", "file:///3.jpg"]
        );
    }

    #[test]
    fn test_extend_cancelled_adds_nothing() {
        let mut gallery = Gallery::new();

        assert_eq!(gallery.extend(PickerResponse::cancelled()), 0);
        assert!(gallery.is_empty());
    }

    #[test]
    fn test_extend_error_code_adds_nothing() {
        let mut gallery = Gallery::new();
        let response = PickerResponse {
            error_code: Some("permission".into()),
            ..PickerResponse::with_uris(["file:///1.jpg"])
        };

        assert_eq!(gallery.extend(response), 0);
    }

    #[test]
    fn test_extend_without_assets_adds_nothing() {
        let mut gallery = Gallery::new();

        assert_eq!(gallery.extend(PickerResponse::default()), 0);
    }

    #[test]
    fn test_rows_chunks_into_three_columns() {
        let mut gallery = Gallery::new();
        gallery.extend(PickerResponse::with_uris(
            (1..=7).map(|n| format!("file:///{n}.jpg")),
        ));

        let widths: Vec<usize> = gallery.rows().map(<[String]>::len).collect();

        assert_eq!(widths, [3, 3, 1]);
    }

    #[test]
    fn test_placeholder_only_when_empty() {
        let mut gallery = Gallery::new();
        assert_eq!(gallery.placeholder(), Some("No photos selected yet"));

        gallery.extend(PickerResponse::with_uris(["file:///1.jpg"]));
        assert_eq!(gallery.placeholder(), None);

        gallery.clear();
        assert_eq!(gallery.placeholder(), Some("No photos selected yet"));
    }

    #[test]
    fn test_picker_response_parses_native_shape() {
        let raw = r#"{"didCancel":false,"assets":[{"uri":"content://1"}]}"#;

        let response: PickerResponse = serde_json::from_str(raw).unwrap();

        assert_eq!(response, PickerResponse::with_uris(["content://1"]));
    }

    #[test]
    fn test_picker_options_default_is_unlimited_photos() {
        let value = serde_json::to_value(PickerOptions::default()).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "mediaType": "photo",
                "selectionLimit": 0,
                "includeBase64": false
            })
        );
    }
}
