//! Responsive box layout and window lifecycle
//!
//! ```text
//! LayoutBox tree ──arrange──▶ Arrangement (name → Dimensions)
//!                                   │
//!                                   ▼
//!                 WindowManager ──▶ SurfaceHost (views)
//! ```
//!
//! [`LayoutManager`] drives one pass per frame; everything below it is usable
//! on its own.

pub mod arrange;
pub mod boxes;
pub mod builder;
pub mod dimensions;
pub mod error;
pub mod focus;
pub mod manager;
pub mod responsive;
pub mod screen;
pub mod scroll;
pub mod surface;
pub mod window;

#[cfg(test)]
pub(crate) mod testing;

pub use arrange::{arrange, Arrangement};
pub use boxes::{BoxContent, Direction, LayoutBox, Sizing};
pub use builder::{build_plan, LayoutPlan, Preset};
pub use dimensions::Dimensions;
pub use error::{LayoutError, SurfaceError};
pub use focus::{FocusManager, FocusTransition};
pub use manager::LayoutManager;
pub use responsive::{adapt_config, Breakpoint, BreakpointConfig, LayoutMode};
pub use screen::{ScreenManager, ScreenMode};
pub use scroll::ScrollState;
pub use surface::{SurfaceHost, SurfaceId, View, ViewRegistry};
pub use window::{ViewChange, Window, WindowManager};
