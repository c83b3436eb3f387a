pub mod components;
pub mod layouts;
pub mod pages;

// Re-exports for convenience
pub use components::{bar_chart, metric_tile, segment_table};
pub use layouts::desktop::desktop_layout;
