//! Mobile bottom sheet holding the property list.
//!
//! Three heights, switched by how far the handle was dragged. Only the
//! distance counts; release velocity is ignored.

use tracing::debug;

/// Drag distance that must be exceeded to change state.
pub const DRAG_THRESHOLD_PX: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SheetState {
    /// Only the handle and a summary row show above the map
    #[default]
    Peeked,
    /// List covers most of the screen
    Expanded,
    /// Full height while the search box has focus
    SearchExpanded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    Opened,
    Closed,
    Unchanged,
}

#[derive(Debug, Default)]
pub struct BottomSheet {
    state: SheetState,
    drag_start_y: Option<f64>,
}

impl BottomSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SheetState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != SheetState::Peeked
    }

    /// The map is hidden only while search owns the screen.
    pub fn map_visible(&self) -> bool {
        self.state != SheetState::SearchExpanded
    }

    pub fn drag_start(&mut self, y: f64) {
        self.drag_start_y = Some(y);
    }

    /// Finish a drag at screen `y` (grows downward). A release without a
    /// start is ignored.
    pub fn drag_end(&mut self, y: f64) -> DragOutcome {
        let Some(start) = self.drag_start_y.take() else {
            return DragOutcome::Unchanged;
        };
        let delta = start - y; // positive = dragged up

        let outcome = if delta > DRAG_THRESHOLD_PX {
            if self.state == SheetState::Peeked {
                self.state = SheetState::Expanded;
            }
            DragOutcome::Opened
        } else if delta < -DRAG_THRESHOLD_PX {
            self.state = SheetState::Peeked;
            DragOutcome::Closed
        } else {
            DragOutcome::Unchanged
        };

        debug!(delta, state = ?self.state, "Bottom sheet drag ended");
        outcome
    }

    pub fn search_focused(&mut self) {
        self.state = SheetState::SearchExpanded;
    }

    pub fn search_blurred(&mut self) {
        if self.state == SheetState::SearchExpanded {
            self.state = SheetState::Expanded;
        }
    }

    pub fn toggle(&mut self) {
        self.state = match self.state {
            SheetState::Peeked => SheetState::Expanded,
            SheetState::Expanded | SheetState::SearchExpanded => SheetState::Peeked,
        };
    }
}
