use serde::{Deserialize, Serialize};

use crate::core::constants::DEFAULT_FONT_FAMILY;
use crate::core::image::{ImageRef, ImageResolver};
use crate::core::types::GridSize;
use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Uniform cell size for every index.
    #[default]
    Grid,
    /// Cell size shrinks by index tier, see `TierTable`.
    Tiered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieredSize {
    Medium,
    #[default]
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitlePosition {
    #[default]
    Right,
    Below,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    #[default]
    Color,
    Image,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Background {
    pub kind: BackgroundKind,
    /// Hex color for `Color`, image URL for `Image`.
    pub value: String,
    pub image: Option<ImageRef>,
}

impl Background {
    #[must_use]
    pub fn color(value: impl Into<String>) -> Self {
        Self {
            kind: BackgroundKind::Color,
            value: value.into(),
            image: None,
        }
    }

    #[must_use]
    pub fn image(image: ImageRef) -> Self {
        Self {
            kind: BackgroundKind::Image,
            value: image.key().to_owned(),
            image: Some(image),
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Self::color("#000000")
    }
}

/// One filled cell.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSlot {
    pub title: String,
    pub creator: Option<String>,
    pub cover_url: String,
    pub cover: ImageRef,
}

impl ItemSlot {
    #[must_use]
    pub fn new(title: impl Into<String>, cover: ImageRef) -> Self {
        Self {
            title: title.into(),
            creator: None,
            cover_url: cover.key().to_owned(),
            cover,
        }
    }

    #[must_use]
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    /// `"{creator} - {title}"`, or the bare title when the creator is absent or empty.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.creator.as_deref() {
            Some(creator) if !creator.is_empty() => format!("{creator} - {}", self.title),
            _ => self.title.clone(),
        }
    }

    #[must_use]
    pub fn creator(&self) -> Option<&str> {
        self.creator.as_deref().filter(|creator| !creator.is_empty())
    }
}

/// Fully resolved description of one collage, immutable for a render call.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    /// Row-major; `None` is an empty cell. Only the first `size.capacity()`
    /// entries render, the rest are kept for when the grid grows.
    pub items: Vec<Option<ItemSlot>>,
    pub size: GridSize,
    pub layout: LayoutMode,
    pub tiered_size: TieredSize,
    pub background: Background,
    pub show_titles: bool,
    pub title_position: TitlePosition,
    pub show_numbers: bool,
    pub gap: u32,
    pub font: Option<String>,
    pub text_color: Option<String>,
    pub shadows: bool,
}

impl Chart {
    #[must_use]
    pub fn new(size: GridSize) -> Self {
        Self {
            title: String::new(),
            items: Vec::new(),
            size,
            layout: LayoutMode::Grid,
            tiered_size: TieredSize::Large,
            background: Background::default(),
            show_titles: false,
            title_position: TitlePosition::Right,
            show_numbers: false,
            gap: 10,
            font: None,
            text_color: None,
            shadows: false,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_items(mut self, items: Vec<Option<ItemSlot>>) -> Self {
        self.items = items;
        self
    }

    /// Places `item` at `index`, growing the item list with empty cells as needed.
    #[must_use]
    pub fn with_item_at(mut self, index: usize, item: ItemSlot) -> Self {
        if self.items.len() <= index {
            self.items.resize(index + 1, None);
        }
        self.items[index] = Some(item);
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: LayoutMode, tiered_size: TieredSize) -> Self {
        self.layout = layout;
        self.tiered_size = tiered_size;
        self
    }

    #[must_use]
    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    #[must_use]
    pub fn with_titles(mut self, position: TitlePosition) -> Self {
        self.show_titles = true;
        self.title_position = position;
        self
    }

    #[must_use]
    pub fn with_numbers(mut self, show_numbers: bool) -> Self {
        self.show_numbers = show_numbers;
        self
    }

    #[must_use]
    pub fn with_gap(mut self, gap: u32) -> Self {
        self.gap = gap;
        self
    }

    #[must_use]
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }

    #[must_use]
    pub fn with_text_color(mut self, color: impl Into<String>) -> Self {
        self.text_color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_shadows(mut self, shadows: bool) -> Self {
        self.shadows = shadows;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.size.is_valid() {
            return Err(ChartError::InvalidData(format!(
                "chart grid must have at least one row and column, got {}x{}",
                self.size.columns, self.size.rows
            )));
        }
        Ok(())
    }

    /// Item at `index`, treating indices past the end of `items` as empty.
    #[must_use]
    pub fn item(&self, index: usize) -> Option<&ItemSlot> {
        self.items.get(index).and_then(Option::as_ref)
    }

    #[must_use]
    pub fn has_title(&self) -> bool {
        !self.title.is_empty()
    }

    #[must_use]
    pub fn font_family(&self) -> &str {
        match self.font.as_deref() {
            Some(font) if !font.trim().is_empty() => font,
            _ => DEFAULT_FONT_FAMILY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSize {
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDocument {
    pub title: String,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(rename = "coverURL")]
    pub cover_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundDocument {
    #[serde(rename = "type")]
    pub kind: BackgroundKind,
    pub value: String,
}

impl Default for BackgroundDocument {
    fn default() -> Self {
        Self {
            kind: BackgroundKind::Color,
            value: "#000000".to_owned(),
        }
    }
}

/// Persisted chart as the state layer stores it: URLs, no image handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDocument {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub items: Vec<Option<ItemDocument>>,
    pub size: DocumentSize,
    #[serde(default)]
    pub layout: LayoutMode,
    #[serde(default)]
    pub tiered_size: TieredSize,
    #[serde(default)]
    pub background: BackgroundDocument,
    #[serde(default)]
    pub show_titles: bool,
    #[serde(default)]
    pub title_position: TitlePosition,
    #[serde(default)]
    pub show_numbers: bool,
    #[serde(default = "default_gap")]
    pub gap: u32,
    #[serde(default)]
    pub font: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub shadows: bool,
}

fn default_gap() -> u32 {
    10
}

impl ChartDocument {
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|err| ChartError::InvalidData(format!("failed to parse chart document: {err}")))
    }

    /// Attaches image handles. URLs the resolver does not know become pending handles.
    #[must_use]
    pub fn resolve(&self, resolver: &impl ImageResolver) -> Chart {
        let lookup =
            |url: &str| resolver.resolve_image(url).unwrap_or_else(|| ImageRef::pending(url));

        let items = self
            .items
            .iter()
            .map(|item| {
                item.as_ref().map(|item| ItemSlot {
                    title: item.title.clone(),
                    creator: item.creator.clone(),
                    cover_url: item.cover_url.clone(),
                    cover: lookup(&item.cover_url),
                })
            })
            .collect();

        let background = match self.background.kind {
            BackgroundKind::Color => Background::color(self.background.value.clone()),
            BackgroundKind::Image => Background {
                kind: BackgroundKind::Image,
                value: self.background.value.clone(),
                image: Some(lookup(&self.background.value)),
            },
        };

        Chart {
            title: self.title.clone(),
            items,
            size: GridSize::new(self.size.x, self.size.y),
            layout: self.layout,
            tiered_size: self.tiered_size,
            background,
            show_titles: self.show_titles,
            title_position: self.title_position,
            show_numbers: self.show_numbers,
            gap: self.gap,
            font: self.font.clone(),
            text_color: self.text_color.clone(),
            shadows: self.shadows,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use super::{BackgroundKind, Chart, ChartDocument, ItemSlot, LayoutMode, TitlePosition};
    use crate::core::image::{ImageMetadata, ImageRef};
    use crate::core::types::GridSize;

    #[test]
    fn missing_trailing_items_read_as_empty() {
        let chart = Chart::new(GridSize::new(2, 2))
            .with_item_at(1, ItemSlot::new("B", ImageRef::pending("b.png")));
        assert!(chart.item(0).is_none());
        assert!(chart.item(1).is_some());
        assert!(chart.item(3).is_none());
    }

    #[test]
    fn zero_sized_grid_is_rejected() {
        assert!(Chart::new(GridSize::new(0, 3)).validate().is_err());
        assert!(Chart::new(GridSize::new(3, 3)).validate().is_ok());
    }

    #[test]
    fn blank_font_falls_back_to_monospace() {
        let chart = Chart::new(GridSize::new(1, 1)).with_font("  ");
        assert_eq!(chart.font_family(), "monospace");
    }

    #[test]
    fn document_resolves_known_and_pending_images() {
        let json = r#"{
            "title": "Top albums",
            "items": [
                {"title": "Blue", "creator": "Joni Mitchell", "coverURL": "blue.jpg"},
                null,
                {"title": "Unknown", "coverURL": "missing.jpg"}
            ],
            "size": {"x": 3, "y": 1},
            "layout": "grid",
            "background": {"type": "image", "value": "bg.jpg"},
            "showTitles": true,
            "titlePosition": "below",
            "gap": 12
        }"#;
        let document = ChartDocument::from_json_str(json).expect("parse document");

        let mut images = HashMap::new();
        images.insert(
            "blue.jpg".to_owned(),
            ImageRef::new("blue.jpg", Arc::new(ImageMetadata::ready(300, 300))),
        );
        let chart = document.resolve(&images);

        assert_eq!(chart.size, GridSize::new(3, 1));
        assert_eq!(chart.layout, LayoutMode::Grid);
        assert_eq!(chart.title_position, TitlePosition::Below);
        assert_eq!(chart.gap, 12);
        assert!(chart.item(0).expect("first item").cover.is_ready());
        assert!(!chart.item(2).expect("third item").cover.is_ready());
        assert_eq!(chart.background.kind, BackgroundKind::Image);
        assert!(
            !chart
                .background
                .image
                .as_ref()
                .expect("background handle")
                .is_ready()
        );
    }
}
