//! Grid ray caster and WAD map reader.
//!
//! - `wad`: bounds-checked reader for the WAD container
//! - `map`: vertex/linedef map model and the tile grid
//! - `raycaster`: DDA column projector writing into a `Framebuffer`
//! - `overlay`: top-down line and square rasterizer
//! - `present`: stretch of the internal buffer onto the window surface

pub mod bsp;
pub mod camera;
pub mod config;
pub mod error;
pub mod framebuffer;
pub mod map;
pub mod overlay;
pub mod present;
pub mod raycaster;
pub mod vector;
pub mod wad;
