use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::Chart;
use crate::core::constants::{CAPTION_TRUNCATION_RATIO, ELLIPSIS};

/// Caption of one filled slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCaption {
    /// 1-based position among filled slots in reading order.
    pub rank: usize,
    pub text: String,
}

/// Captions for every filled slot among the first `slot_count`, keyed by slot index.
///
/// Empty slots get no entry and do not advance the rank.
#[must_use]
pub fn build_captions(chart: &Chart, slot_count: usize) -> IndexMap<usize, ItemCaption> {
    let mut captions = IndexMap::new();
    let mut rank = 0;

    for index in 0..slot_count {
        let Some(item) = chart.item(index) else {
            continue;
        };
        rank += 1;
        let name = item.display_name();
        let text = if chart.show_numbers {
            number_label(rank, &name)
        } else {
            name
        };
        captions.insert(index, ItemCaption { rank, text });
    }

    captions
}

#[must_use]
pub fn number_label(rank: usize, text: &str) -> String {
    format!("{rank}. {text}")
}

/// Longest caption, in characters, that fits under a cell without truncation.
#[must_use]
pub fn caption_max_length(cell_size: f64, gap: f64, font_size_px: f64) -> usize {
    if font_size_px <= 0.0 {
        return usize::MAX;
    }
    let length = ((cell_size + gap) / (font_size_px / CAPTION_TRUNCATION_RATIO)).floor();
    if length.is_finite() && length > 0.0 {
        length as usize
    } else {
        0
    }
}

/// Cuts `text` to `max_length` characters plus an ellipsis once it exceeds
/// `max_length + 3` characters. Shorter text is returned unchanged.
#[must_use]
pub fn truncate_caption(text: &str, max_length: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_length.saturating_add(ELLIPSIS.len()) {
        return text.to_owned();
    }
    let kept: String = text.chars().take(max_length).collect();
    format!("{}{ELLIPSIS}", kept.trim_end())
}
