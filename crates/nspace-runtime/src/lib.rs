//! Level container plus the edit-time and play-time sessions that drive it.
#![forbid(unsafe_code)]

mod edit;
mod level;
mod play;

pub use edit::{EditError, EditSession};
pub use level::{Level, LevelStats};
pub use play::{EntityState, PlaySession, TickReport};
