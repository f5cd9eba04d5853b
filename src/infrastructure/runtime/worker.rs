//! Async worker - profile lookup, catalog scanning, roster access
//!
//! Runs the collaborator work the UI thread must never block on. All
//! results flow back as events; the worker never touches UI state.

use std::sync::mpsc::{Receiver, Sender};
use std::time::Duration;

use anyhow::Result;
use tokio::time::interval;

use crate::domain::access::Identity;
use crate::infrastructure::catalog::{starter_catalog, CatalogScanner};
use crate::infrastructure::runtime::bridge::{RuntimeCommand, RuntimeEvent, WorkerOptions};
use crate::store::MemberStore;

/// Roster reload cadence while idle.
const ROSTER_REFRESH: Duration = Duration::from_secs(30);

/// Run the async worker loop
pub async fn run_worker(
    options: WorkerOptions,
    cmd_rx: Receiver<RuntimeCommand>,
    evt_tx: Sender<RuntimeEvent>,
) -> Result<()> {
    let store = open_store(&options, &evt_tx);

    // Initial round: identity first (the UI is gating tabs on it), then
    // content, then roster.
    fetch_profile(&options, store.as_ref(), &evt_tx);
    reload_catalog(&options, &evt_tx);
    refresh_roster(store.as_ref(), &evt_tx);

    let mut poll = interval(Duration::from_millis(250));
    let mut since_roster = Duration::ZERO;

    loop {
        poll.tick().await;
        since_roster += Duration::from_millis(250);

        // Process commands (non-blocking)
        while let Ok(cmd) = cmd_rx.try_recv() {
            match cmd {
                RuntimeCommand::Shutdown => return Ok(()),

                RuntimeCommand::FetchProfile => {
                    fetch_profile(&options, store.as_ref(), &evt_tx);
                }

                RuntimeCommand::ReloadCatalog => {
                    reload_catalog(&options, &evt_tx);
                }

                RuntimeCommand::RefreshRoster => {
                    refresh_roster(store.as_ref(), &evt_tx);
                    since_roster = Duration::ZERO;
                }

                RuntimeCommand::Invite { name } => {
                    if let Some(store) = store.as_ref() {
                        match store.invite(&name) {
                            Ok(true) => {}
                            Ok(false) => {
                                let _ = evt_tx.send(RuntimeEvent::Error {
                                    message: format!("Member {name} already exists"),
                                });
                            }
                            Err(err) => {
                                let _ = evt_tx.send(RuntimeEvent::Error {
                                    message: format!("Invite failed: {:#}", err),
                                });
                            }
                        }
                        refresh_roster(Some(store), &evt_tx);
                        since_roster = Duration::ZERO;
                    }
                }

                RuntimeCommand::Promote { name, role } => {
                    if let Some(store) = store.as_ref() {
                        match store.promote(&name, role) {
                            Ok(true) => {
                                // The promoted member may be us.
                                fetch_profile(&options, Some(store), &evt_tx);
                            }
                            Ok(false) => {
                                let _ = evt_tx.send(RuntimeEvent::Error {
                                    message: format!("No member named {name}"),
                                });
                            }
                            Err(err) => {
                                let _ = evt_tx.send(RuntimeEvent::Error {
                                    message: format!("Promote failed: {:#}", err),
                                });
                            }
                        }
                        refresh_roster(Some(store), &evt_tx);
                        since_roster = Duration::ZERO;
                    }
                }

                RuntimeCommand::Charge {
                    member,
                    amount_cents,
                } => {
                    if let Some(store) = store.as_ref() {
                        if let Err(err) = store.record_payment(&member, amount_cents, "USD") {
                            let _ = evt_tx.send(RuntimeEvent::Error {
                                message: format!("Charge failed: {:#}", err),
                            });
                        }
                        refresh_roster(Some(store), &evt_tx);
                        since_roster = Duration::ZERO;
                    }
                }
            }
        }

        if since_roster >= ROSTER_REFRESH {
            refresh_roster(store.as_ref(), &evt_tx);
            since_roster = Duration::ZERO;
        }
    }
}

fn open_store(options: &WorkerOptions, evt_tx: &Sender<RuntimeEvent>) -> Option<MemberStore> {
    let path = options.members_db.as_ref()?;
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    match MemberStore::open(path) {
        Ok(store) => {
            // First run: the configured profile becomes the first member row.
            if let Err(err) =
                store.ensure_member(&options.login, options.fallback_role, options.fallback_tier)
            {
                let _ = evt_tx.send(RuntimeEvent::Error {
                    message: format!("Member DB seed failed: {:#}", err),
                });
            }
            Some(store)
        }
        Err(err) => {
            let _ = evt_tx.send(RuntimeEvent::Error {
                message: format!("Member DB disabled: {:#}", err),
            });
            None
        }
    }
}

fn fetch_profile(
    options: &WorkerOptions,
    store: Option<&MemberStore>,
    evt_tx: &Sender<RuntimeEvent>,
) {
    let identity = match store.map(|store| store.lookup(&options.login)) {
        Some(Ok(Some(record))) => Identity::new(record.name, record.role, record.tier),
        Some(Ok(None)) | None => Identity::new(
            options.login.clone(),
            options.fallback_role,
            options.fallback_tier,
        ),
        Some(Err(err)) => {
            let _ = evt_tx.send(RuntimeEvent::Error {
                message: format!("Profile lookup failed: {:#}", err),
            });
            Identity::new(
                options.login.clone(),
                options.fallback_role,
                options.fallback_tier,
            )
        }
    };
    let _ = evt_tx.send(RuntimeEvent::ProfileLoaded { identity });
}

fn reload_catalog(options: &WorkerOptions, evt_tx: &Sender<RuntimeEvent>) {
    let mut catalog = CatalogScanner::scan(&options.catalog_root);
    if catalog.is_empty() {
        // Fresh install with no course files: fall back to the built-in
        // starter content, keeping whatever scan errors were collected.
        let errors = std::mem::take(&mut catalog.errors);
        let scanned = catalog.scanned_files;
        catalog = starter_catalog();
        catalog.errors = errors;
        catalog.scanned_files = scanned;
    }
    let _ = evt_tx.send(RuntimeEvent::CatalogReady { catalog });
}

fn refresh_roster(store: Option<&MemberStore>, evt_tx: &Sender<RuntimeEvent>) {
    let Some(store) = store else {
        return;
    };
    let members = match store.load_members() {
        Ok(members) => members,
        Err(err) => {
            let _ = evt_tx.send(RuntimeEvent::Error {
                message: format!("Roster load failed: {:#}", err),
            });
            return;
        }
    };
    let payments = match store.load_payments() {
        Ok(payments) => payments,
        Err(err) => {
            let _ = evt_tx.send(RuntimeEvent::Error {
                message: format!("Payments load failed: {:#}", err),
            });
            return;
        }
    };
    let _ = evt_tx.send(RuntimeEvent::RosterReady { members, payments });
}
