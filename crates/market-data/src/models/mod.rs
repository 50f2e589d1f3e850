//! Market data models
//!
//! - `instrument` - Instrument identity (InstrumentId)
//! - `session` - Daily trading session with optional open/close (Session)
//! - `window` - Calendar window fetched around a target date (SessionWindow)

mod instrument;
mod session;
mod window;

pub use instrument::InstrumentId;
pub use session::Session;
pub use window::SessionWindow;
