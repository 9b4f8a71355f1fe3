//! Option Gate - relationship and visibility filtering of choices.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::content::DialogueOption;

/// An option that survived filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatedOption {
    /// Position in the unfiltered list. `None` for the synthesized fallback.
    pub source_index: Option<usize>,
    pub option: DialogueOption,
}

impl GatedOption {
    pub fn is_fallback(&self) -> bool {
        self.source_index.is_none()
    }
}

/// Filter a choice list for the current relationship value.
///
/// Visible options keep their original order. An option is shown if it is
/// not hidden, or if it is hidden and the relationship is inside its gate.
/// Never returns an empty list: a lone "Continue" option ending the story
/// is synthesized instead.
pub fn filter_options(options: &[DialogueOption], relationship: i32) -> Vec<GatedOption> {
    let mut visible: Vec<GatedOption> = options
        .iter()
        .enumerate()
        .filter(|(_, option)| !option.is_hidden || option.gate_allows(relationship))
        .map(|(index, option)| GatedOption {
            source_index: Some(index),
            option: option.clone(),
        })
        .collect();

    if visible.is_empty() {
        debug!(
            total = options.len(),
            relationship, "No visible options, synthesizing fallback"
        );
        visible.push(GatedOption {
            source_index: None,
            option: DialogueOption::fallback_continue(),
        });
    }

    visible
}

/// Keep a selection index inside a list that may have shrunk.
pub fn clamp_selection(selection: usize, count: usize) -> usize {
    selection.min(count.saturating_sub(1))
}
