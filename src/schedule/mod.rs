//! Wallpaper descriptions and the cyclic knot sequences built from them.
//!
//! ## Module Structure
//!
//! - [`description`]: what a wallpaper package declares (schedule kind, images
//!   and the moment each one belongs to), parsed from TOML or JSON
//! - [`knots`]: sorted keyframes over one cycle and the bracket lookup that
//!   turns a phase into two images and a blend factor

pub mod description;
pub mod knots;

pub use description::{DescriptionEntry, ImageRef, KnotTime, ScheduleKind, WallpaperDescription};
pub use knots::{Bracket, Knot, KnotSequence};

/// What the display layer should draw: `top` over `bottom` at `blend` opacity.
#[derive(Debug, Clone, PartialEq)]
pub struct Layers {
    pub bottom: ImageRef,
    pub top: ImageRef,
    /// Opacity of `top`, in [0, 1].
    pub blend: f64,
}

impl Layers {
    pub fn is_blending(&self) -> bool {
        self.blend > 0.0 && self.top != self.bottom
    }
}
