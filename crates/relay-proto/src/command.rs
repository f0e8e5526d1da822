//! Client command parsing.
//!
//! Commands are recognized by string prefix to stay wire-compatible with
//! existing clients: `/join x` is a command, but a bare `/join` with no
//! space does not match the prefix and is relayed as ordinary chat text.

/// One parsed client line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/join <group>` — create the group if absent, then join it.
    Join(String),
    /// `/create <group>` — create the group if absent; do not join.
    Create(String),
    /// `/members` — list the current group's member addresses.
    Members,
    /// `/file <name>` — switch the connection to raw file-receive mode.
    /// Every byte after this line, until end-of-stream, is file payload.
    File(String),
    /// Any other non-empty line, relayed to the sender's current group.
    Chat(String),
}

impl Command {
    /// Parse one newline-stripped input line.
    ///
    /// Returns `None` for empty lines, which carry nothing worth relaying.
    pub fn parse(line: &str) -> Option<Command> {
        if line.is_empty() {
            return None;
        }

        let cmd = if let Some(name) = line.strip_prefix("/join ") {
            Command::Join(name.to_string())
        } else if let Some(name) = line.strip_prefix("/create ") {
            Command::Create(name.to_string())
        } else if line == "/members" {
            Command::Members
        } else if let Some(name) = line.strip_prefix("/file ") {
            Command::File(name.to_string())
        } else {
            Command::Chat(line.to_string())
        };

        Some(cmd)
    }
}
