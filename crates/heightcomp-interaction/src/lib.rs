//! # HeightComp Interaction
//!
//! Direct manipulation of compared entities with mouse or touch.
//!
//! The [`DragController`] turns pointer events into offset updates and
//! click requests. It is a plain state machine: the host feeds it pointer
//! samples plus the current [`DragContext`], and applies the returned
//! [`DragEffect`]s, including scheduling the long-press callback.

pub mod drag;
pub mod long_press;
pub mod pointer;

pub use drag::{
    DragConfig, DragContext, DragController, DragEffect, DragPhase, DragTarget, EntityRequest,
    DEFAULT_CLAMP_FACTOR, DEFAULT_DRAG_THRESHOLD_PX, DEFAULT_LONG_PRESS_MS,
};
pub use long_press::{LongPressTimer, LongPressToken};
pub use pointer::{PointerId, PointerKind, PointerPosition, PointerSample};
