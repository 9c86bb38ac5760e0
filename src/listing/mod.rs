pub mod list;
pub mod pagination;
pub mod panel;

pub use list::{PropertyList, ScrollTarget};
pub use pagination::{PageSizes, Paginator};
pub use panel::{BottomSheet, DragOutcome, SheetState, DRAG_THRESHOLD_PX};
