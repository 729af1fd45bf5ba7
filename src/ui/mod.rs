//! User interface layer: view models and plain-text rendering.
//!
//! ```text
//! EngineState → compute_viewmodel → UIViewModel → render → text
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types representing renderable UI state
//! - [`renderer`]: Plain-text layout of a view model
//! - [`helpers`]: Shared rendering utilities (highlighting, truncation)

pub mod helpers;
pub mod renderer;
pub mod viewmodel;

pub use renderer::render;
pub use viewmodel::{
    Card, DetailView, EmptyState, FooterInfo, HeaderInfo, OverlayView, PosterView, PreviewItem,
    SearchBarInfo, UIViewModel,
};
