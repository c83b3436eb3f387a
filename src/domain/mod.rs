pub mod clean;
pub mod filter;
pub mod normalize;
pub mod record;
pub mod stats;
