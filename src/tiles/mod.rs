pub mod layer;
pub mod loader;
pub mod source;

// Re-exports for convenience
pub use layer::SurveyTileLayer;
pub use loader::{fetch_image_data, TileImage, TileLoader, TileResult};
pub use source::{SurveyTileSource, TileSource};
