//! Command dispatch for the session loop.
//!
//! Each parsed [`Command`] maps to one hub operation plus its reply lines.
//! Replies to the issuing client go through its own outbound queue; relayed
//! chat fans out to a snapshot of the group taken in one critical section.

use crate::state::{ConnId, Hub};
use relay_proto::Command;
use tokio::sync::mpsc;
use tracing::debug;

/// Advisory sent whenever a group-scoped command is issued outside a group.
pub const NOT_IN_GROUP: &str = "You are not in a group";

/// What the session loop should do after a command is handled.
pub enum SessionAction {
    /// Keep reading lines.
    Continue,
    /// Switch the connection's inbound side to raw file-receive mode.
    /// The transfer consumes the rest of the stream, so this is terminal.
    ReceiveFile(String),
}

/// Handle one command on behalf of connection `id`.
pub async fn dispatch(
    hub: &Hub,
    id: ConnId,
    reply_tx: &mpsc::Sender<String>,
    cmd: Command,
) -> SessionAction {
    match cmd {
        Command::Join(name) => {
            hub.join(id, &name);
            reply(reply_tx, format!("Joined group {name}")).await;
        }
        Command::Create(name) => {
            hub.ensure_group(&name);
            reply(reply_tx, format!("Group {name} created")).await;
        }
        Command::Members => match hub.members_of(id) {
            Some((group, addrs)) => {
                reply(reply_tx, format!("Members of {group}:")).await;
                for addr in addrs {
                    reply(reply_tx, addr.ip().to_string()).await;
                }
            }
            None => reply(reply_tx, NOT_IN_GROUP.to_string()).await,
        },
        Command::Chat(text) => match hub.broadcast_targets(id) {
            Some(targets) => {
                // Fire-and-forget: a slow or closed peer drops the line,
                // the rest of the group still receives it.
                for peer in targets {
                    if let Err(e) = peer.try_send(text.clone()) {
                        debug!(conn = id, error = %e, "Dropped relayed line for peer");
                    }
                }
            }
            None => reply(reply_tx, NOT_IN_GROUP.to_string()).await,
        },
        Command::File(name) => return SessionAction::ReceiveFile(name),
    }

    SessionAction::Continue
}

/// Queue a reply to the issuing client. A closed writer means the session
/// is already tearing down, so the loss is harmless.
async fn reply(tx: &mpsc::Sender<String>, line: String) {
    if tx.send(line).await.is_err() {
        debug!("Reply dropped; writer already gone");
    }
}
