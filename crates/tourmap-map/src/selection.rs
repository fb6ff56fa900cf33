//! Which marker is selected, and whether a pending detail lookup still
//! belongs to the current selection.
//!
//! Every selection change hands out a fresh [`SelectionToken`]. A lookup that
//! finishes after the selection moved on presents a token that no longer
//! matches, and its result is dropped.

use tourmap_core::{MarkerDescriptor, PlaceDetails};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SelectionState {
    #[default]
    Unselected,
    Selected {
        index: usize,
        descriptor: MarkerDescriptor,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionToken(u64);

#[derive(Debug, Default)]
pub struct Selection {
    state: SelectionState,
    token: u64,
    details: Option<PlaceDetails>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the selection to `index`.
    ///
    /// Returns `None` when `index` is already selected; the caller must not
    /// start another lookup in that case. Otherwise the previous details are
    /// cleared and the returned token identifies the new selection.
    pub fn begin(&mut self, index: usize, descriptor: MarkerDescriptor) -> Option<SelectionToken> {
        if self.selected_index() == Some(index) {
            return None;
        }
        self.token += 1;
        self.state = SelectionState::Selected { index, descriptor };
        self.details = None;
        Some(SelectionToken(self.token))
    }

    /// Stores `details` if `token` still names the current selection.
    pub fn resolve(&mut self, token: SelectionToken, details: PlaceDetails) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.details = Some(details);
        true
    }

    #[must_use]
    pub fn is_current(&self, token: SelectionToken) -> bool {
        token.0 == self.token && matches!(self.state, SelectionState::Selected { .. })
    }

    #[must_use]
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Details of the selected place, once its lookup has resolved.
    #[must_use]
    pub fn details(&self) -> Option<&PlaceDetails> {
        self.details.as_ref()
    }

    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        match self.state {
            SelectionState::Selected { index, .. } => Some(index),
            SelectionState::Unselected => None,
        }
    }

    /// Back to `Unselected`. Outstanding tokens become stale.
    pub fn reset(&mut self) {
        self.token += 1;
        self.state = SelectionState::Unselected;
        self.details = None;
    }
}
