pub mod cache;
pub mod config;
pub mod status;

pub use cache::{CacheDocument, CachedResult, DirectoryCacheEntry};
pub use config::{CacheSettings, Config, ConfigMode, ToolStyle};
pub use status::{OutdatedMap, OutdatedStatus, StatusMap, ToolStatus};
