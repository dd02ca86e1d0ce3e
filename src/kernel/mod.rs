//! Headless application core (state/action/effect).

pub mod action;
pub mod editor;
pub mod effect;
pub mod services;
pub mod state;
pub mod store;

pub use action::{Action, FsOp};
pub use editor::{EditorAction, EditorSession, SessionPhase};
pub use effect::Effect;
pub use state::{AppState, ExplorerState, Notification, NotificationState};
pub use store::{DispatchResult, Store};
