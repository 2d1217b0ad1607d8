//! Anwendungsschicht: Session-Zustand, Ereignisse, Orchestrierung.

pub mod events;
pub mod session;
pub mod state;

pub use events::{MouseButton, SessionIntent};
pub use session::{MapSession, RenderOutput};
pub use state::{SessionState, Tool, ToolState, ViewportGeometry};
