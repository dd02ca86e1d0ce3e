//! Editor domain: session bridge + persistence scheduler.

mod action;
mod scheduler;
mod state;

pub use action::EditorAction;
pub use scheduler::{PendingSave, SaveScheduler, SaveTimerId};
pub use state::{
    BufferId, BufferStore, EditorSession, OpenFile, OpenOrigin, ReadRequestId, SessionPhase,
    Switch, SwitchStage,
};
