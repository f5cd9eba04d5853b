//! Runtime bridge - connects the sync TUI thread with the async worker
//!
//! The worker thread owns the member database and the catalog scan; the
//! UI thread sends commands and drains events once per tick. Identity is
//! delivered here too: the UI starts with an unresolved role and picks
//! up `ProfileLoaded` when the lookup finishes.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use tokio::runtime::Runtime;

use crate::domain::access::{Identity, MembershipTier, Role};
use crate::domain::catalog::CourseCatalog;
use crate::infrastructure::runtime::worker::run_worker;
use crate::store::{MemberRecord, PaymentRecord};

/// Commands sent from the TUI to the async worker
#[derive(Debug, Clone)]
pub enum RuntimeCommand {
    /// Re-run the profile lookup
    FetchProfile,
    /// Re-scan the courses directory
    ReloadCatalog,
    /// Re-load members and payments
    RefreshRoster,
    /// Add a member with the default role
    Invite { name: String },
    /// Change a member's role
    Promote { name: String, role: Role },
    /// Record a settled payment
    Charge { member: String, amount_cents: i64 },
    /// Shutdown the worker
    Shutdown,
}

/// Events sent from the async worker to the TUI
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// Profile lookup finished
    ProfileLoaded { identity: Identity },
    /// Catalog scan finished
    CatalogReady { catalog: CourseCatalog },
    /// Roster load finished
    RosterReady {
        members: Vec<MemberRecord>,
        payments: Vec<PaymentRecord>,
    },
    /// Error occurred
    Error { message: String },
}

/// Everything the worker needs to stand in for the platform's hosted
/// collaborators.
#[derive(Debug, Clone)]
pub struct WorkerOptions {
    pub login: String,
    pub fallback_role: Role,
    pub fallback_tier: MembershipTier,
    pub members_db: Option<PathBuf>,
    pub catalog_root: PathBuf,
}

/// Bridge between sync TUI thread and the async worker runtime
pub struct RuntimeBridge {
    cmd_tx: Sender<RuntimeCommand>,
    evt_rx: Receiver<RuntimeEvent>,
}

impl RuntimeBridge {
    pub fn new(options: WorkerOptions) -> anyhow::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<RuntimeCommand>();
        let (evt_tx, evt_rx) = mpsc::channel::<RuntimeEvent>();

        // Spawn the worker thread with its own Tokio runtime
        thread::spawn(move || {
            let rt = Runtime::new().expect("Failed to create Tokio runtime");
            rt.block_on(async {
                if let Err(err) = run_worker(options, cmd_rx, evt_tx.clone()).await {
                    let _ = evt_tx.send(RuntimeEvent::Error {
                        message: format!("Worker exited: {:#}", err),
                    });
                }
            });
        });

        Ok(Self { cmd_tx, evt_rx })
    }

    /// Send a command to the async worker
    pub fn send(&self, cmd: RuntimeCommand) -> anyhow::Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| anyhow::anyhow!("Worker channel closed"))
    }

    /// Poll for events (non-blocking)
    pub fn poll_events(&self) -> Vec<RuntimeEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.evt_rx.try_recv() {
            events.push(evt);
        }
        events
    }
}

impl Drop for RuntimeBridge {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(RuntimeCommand::Shutdown);
    }
}
