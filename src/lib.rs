//! Biome splat synthesis library
//!
//! Builds terrain texture-blend weights from circular biome zones and
//! re-exports modules for use by binaries and tools.

pub mod config;
pub mod curve;
pub mod error;
pub mod export;
pub mod grid;
pub mod probe;
pub mod sculpt;
pub mod splat;
pub mod tilemap;
pub mod weight_buffer;
pub mod zones;

pub use curve::ResponseCurve;
pub use error::{ConfigError, ZoneWarning};
pub use grid::TerrainGrid;
pub use splat::{synthesize, synthesize_with, SplatParams};
pub use weight_buffer::WeightBuffer;
pub use zones::BiomeZone;
