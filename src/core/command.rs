//! Menu and keyboard commands
//!
//! Every user-facing action that does not carry a payload is a `Command`.
//! Hosts bind them by name (`"save"`, `"navigateBack"` ...) and hand them to
//! the store, which handles each variant exhaustively.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    // ==================== File ====================
    Save,
    CloseFile,

    // ==================== Navigation ====================
    NavigateBack,
    NavigateForward,

    // ==================== Explorer ====================
    RefreshExplorer,
    CollapseAll,
}

impl Command {
    pub const ALL: [Command; 6] = [
        Command::Save,
        Command::CloseFile,
        Command::NavigateBack,
        Command::NavigateForward,
        Command::RefreshExplorer,
        Command::CollapseAll,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Command::Save => "save",
            Command::CloseFile => "closeFile",
            Command::NavigateBack => "navigateBack",
            Command::NavigateForward => "navigateForward",
            Command::RefreshExplorer => "refreshExplorer",
            Command::CollapseAll => "collapseAll",
        }
    }

    /// Looks a command up by its bound name. Short aliases used by the
    /// command line are accepted as well.
    pub fn from_name(name: &str) -> Option<Command> {
        let name = name.trim();
        if let Some(cmd) = Self::ALL.iter().find(|c| c.name() == name) {
            return Some(*cmd);
        }
        match name {
            "close" => Some(Command::CloseFile),
            "back" => Some(Command::NavigateBack),
            "forward" => Some(Command::NavigateForward),
            "refresh" => Some(Command::RefreshExplorer),
            _ => None,
        }
    }

    pub fn is_navigation_command(&self) -> bool {
        matches!(self, Command::NavigateBack | Command::NavigateForward)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/core/command.rs"]
mod tests;
