//! Rasterization of chart primitives.
//!
//! # Algorithms
//!
//! - **Wu's Anti-aliased Line**: Smooth line rendering with sub-pixel accuracy
//! - **Midpoint Circle**: Filled scatter markers
//! - **Edge functions**: Filled triangles for arrow heads
//!
//! # References
//!
//! - Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.

mod primitives;

pub use primitives::{
    draw_arrow, draw_circle, draw_dashed_line, draw_line_aa, draw_rect,
    draw_thick_line, draw_triangle,
};
