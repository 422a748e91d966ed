//! Collaboration monitor entry point
//!
//! Mounts one room and logs presence and list changes until Ctrl-C:
//! ```bash
//! cargo run -p collab-client --bin collab-monitor -- ticket:42
//! ```
//!
//! Configuration is loaded from environment variables.

use anyhow::{bail, Context};
use collab_client::{CollabClient, SessionEvent, TeamRoom, TicketCollaboration};
use collab_common::{try_init_tracing_with_config, ClientConfig, TracingConfig};
use collab_core::RoomId;
use tokio::sync::{broadcast, watch};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, "Monitor failed");
        std::process::exit(1);
    }
}

/// A mounted room of either kind
enum Mounted {
    Ticket(TicketCollaboration),
    Team(TeamRoom),
}

impl Mounted {
    fn subscribe(&self) -> watch::Receiver<u64> {
        match self {
            Self::Ticket(ticket) => ticket.subscribe(),
            Self::Team(team) => team.subscribe(),
        }
    }

    fn log_lists(&self) {
        match self {
            Self::Ticket(ticket) => info!(
                room = %ticket.room(),
                notes = ticket.notes().len(),
                subtasks = ticket.subtasks().len(),
                load_state = ?ticket.load_state(),
                "Ticket changed"
            ),
            Self::Team(team) => info!(
                room = %team.room(),
                messages = team.messages().len(),
                load_state = ?team.load_state(),
                "Team room changed"
            ),
        }
    }

    async fn unmount(&self) {
        match self {
            Self::Ticket(ticket) => ticket.unmount().await,
            Self::Team(team) => team.unmount().await,
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let Some(arg) = std::env::args().nth(1) else {
        bail!("usage: collab-monitor <ticket:ID|team:ID>");
    };
    let room: RoomId = arg.parse().with_context(|| format!("invalid room {arg:?}"))?;

    let config = ClientConfig::from_env().context("Failed to load configuration")?;
    if let Err(e) = try_init_tracing_with_config(&TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }
    info!(env = ?config.app.env, room = %room, "Starting collaboration monitor");

    let client = CollabClient::from_config(config)?;
    let mut lifecycle = client.session().subscribe_lifecycle();
    let _handle = client.start().await?;

    let mounted = match room {
        RoomId::Ticket(id) => Mounted::Ticket(client.mount_ticket(id)),
        RoomId::Team(id) => Mounted::Team(client.mount_team(id)),
    };
    let mut lists = mounted.subscribe();
    let mut ledger = client.ledger().subscribe();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
            changed = lists.changed() => {
                if changed.is_err() {
                    break;
                }
                mounted.log_lists();
            }
            changed = ledger.changed() => {
                if changed.is_err() {
                    break;
                }
                let presence = client.ledger();
                info!(
                    room = %room,
                    active = ?presence.active_users(room),
                    typing = ?presence.typing_users(room),
                    "Presence changed"
                );
            }
            event = lifecycle.recv() => match event {
                Ok(SessionEvent::ReconnectFailed { reason }) => {
                    error!(reason = %reason, "Connection lost for good");
                    break;
                }
                Ok(event) => info!(?event, "Session event"),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(lagged = n, "Lifecycle events skipped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }

    mounted.unmount().await;
    Ok(())
}
