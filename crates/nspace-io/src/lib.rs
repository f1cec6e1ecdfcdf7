//! Level files and editor configuration.
#![forbid(unsafe_code)]

pub mod config;
pub mod level_file;
pub mod load;
pub mod save;

pub use config::{ConfigError, EditorConfig};
pub use level_file::{EntityRecord, FaceRecord, LevelFile, ObjectRecord, SubstanceRecord, VoxelRecord};
pub use load::{LevelError, Registries, level_from_file, load_level, load_level_from_path};
pub use save::{level_to_file, save_level, save_level_to_path};
