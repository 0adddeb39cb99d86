//! # HeightComp Layout
//!
//! Converts a list of compared entities into pixel geometry.
//!
//! ## Pipeline
//!
//! ```text
//! entities + zoom + container height
//!   └── scale     (visible cm range, ruler step, px/cm)
//!         └── fit       (compress the row to the available width)
//!               ├── ruler     (nice step, dual-unit marks)
//!               └── projector (per-entity boxes on the ground line)
//! ```
//!
//! [`compute_scene`] runs all stages at once and is cheap enough to call on
//! every change of the inputs.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use heightcomp_layout::{compute_scene, LayoutParams, ViewportSize, ZoomLevel};
//!
//! let scene = compute_scene(
//!     store.entities(),
//!     ZoomLevel::new(50),
//!     ViewportSize::new(400.0, 800.0),
//!     &LayoutParams::default(),
//! );
//! for mark in &scene.marks {
//!     draw_line(scene.y_for_cm(mark.value_cm), &mark.label_cm, &mark.label_ft_in);
//! }
//! ```

pub mod fit;
pub mod projector;
pub mod ruler;
pub mod scale;
pub mod scene;
pub mod viewport;

pub use fit::{compute_horizontal_fit, HorizontalFit, DEFAULT_GAP_PX};
pub use projector::{layout_row, project_entities, ProjectedEntity, RowPlacement};
pub use ruler::{compute_major_step, generate_marks, RulerMark, MIN_MAJOR_STEP_CM};
pub use scale::{compute_vertical_scale, VerticalScale};
pub use scene::{compute_scene, LayoutParams, Scene};
pub use viewport::{ViewportSize, ZoomLevel};
