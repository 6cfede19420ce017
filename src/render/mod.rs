//! # render
//!
//! Frame drawing. [`chart::ChartRenderer`] paints onto any
//! [`surface::Surface`]; [`svg::SvgSurface`] is the headless implementation.

pub mod animation;
pub mod chart;
pub mod layout;
pub mod surface;
pub mod svg;

pub use chart::{ChartRenderer, FrameStats, Palette};
pub use surface::{RecordingSurface, Surface};
pub use svg::SvgSurface;
