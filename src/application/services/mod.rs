//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem) but are themselves
//! concrete structs, not traits.

mod browser;
mod seed;
mod session;

pub use browser::BrowserService;
pub use seed::SeedService;
pub use session::{SessionCommand, SessionOutput, SessionService};
