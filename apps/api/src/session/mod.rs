// Per-visitor editing sessions. A session owns the Profile Store, the Render
// Surface and the export gate; signed-in sessions also own an autosave task.

pub mod handlers;
pub mod identity;
pub mod registry;

pub use identity::Identity;
pub use registry::SessionRegistry;
