//! Trading session resolution.
//!
//! - [`sessions_model`] - Direction, reference pair, resolved session maps
//! - [`sessions_resolver`] - Nearest-session and whole-universe resolution
//! - [`sessions_cleaner`] - Removal of sessions with missing prices

pub mod sessions_cleaner;
pub mod sessions_model;
pub mod sessions_resolver;

pub use sessions_cleaner::clean;
pub use sessions_model::{
    Direction, ReferencePair, ResolutionRequest, ResolvedSession, ResolvedSessionMap,
};
pub use sessions_resolver::{resolve_nearest, resolve_universe, SessionWindows};
