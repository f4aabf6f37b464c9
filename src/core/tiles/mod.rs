pub mod errors;
pub mod tile_cache;

pub use errors::TileCacheError;
pub use tile_cache::{BLANK_SAMPLE, CacheState, FillPlan, MovePlan, TileCache};
