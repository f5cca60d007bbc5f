pub mod components;
pub mod layout;
mod render;
pub mod state;

/// A trait for UI components that enforces a standard rendering interface.
pub use render::Component;
/// Immutable data required to draw a single UI frame.
pub use render::RenderContext;
/// Renders a complete frame including status bar, composer, and footer.
pub use render::render;
