//! Interactive loop
//!
//! Every synchronizer operation runs as its own task so the prompt stays
//! usable while requests are in flight; each task re-renders when it
//! finishes.

use std::future::Future;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use chatdesk_core::{DeleteRequest, SessionSynchronizer};

use crate::command::{Command, Target};
use crate::view;

pub async fn run(synchronizer: SessionSynchronizer) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending_delete: Option<DeleteRequest> = None;

    while let Some(line) = lines.next_line().await? {
        if let Some(request) = pending_delete.take() {
            if matches!(line.trim().to_lowercase().as_str(), "y" | "yes") {
                spawn_rendered(&synchronizer, request.confirm());
            } else {
                request.cancel();
                println!("Kept.");
            }
            continue;
        }

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => println!("{}", view::HELP),
            Command::List => view::render_sessions(&synchronizer.snapshot()),
            Command::Blank => {
                if synchronizer.editing().is_some() {
                    synchronizer.cancel_rename();
                    println!("Rename cancelled.");
                }
            }
            Command::Text(text) => match synchronizer.editing() {
                Some(draft) => {
                    let sync = synchronizer.clone();
                    spawn_rendered(&synchronizer, async move {
                        sync.rename_session(&draft.session_id, &text).await
                    });
                }
                None => {
                    let sync = synchronizer.clone();
                    spawn_rendered(&synchronizer, async move { sync.send_message(&text).await });
                }
            },
            Command::New => {
                let sync = synchronizer.clone();
                spawn_rendered(&synchronizer, async move {
                    sync.create_session().await;
                });
            }
            Command::Switch(target) => {
                if let Some(session_id) = resolve(&synchronizer, &target) {
                    let sync = synchronizer.clone();
                    spawn_rendered(&synchronizer, async move {
                        sync.switch_session(&session_id).await
                    });
                }
            }
            Command::Rename(target) => {
                if let Some(session_id) = resolve(&synchronizer, &target) {
                    match synchronizer.start_rename(&session_id) {
                        Some(draft) => println!(
                            "New title for \"{}\" (empty line or /cancel to keep it):",
                            draft.title
                        ),
                        None => println!("No chat {session_id} in the list."),
                    }
                }
            }
            Command::Cancel => {
                synchronizer.cancel_rename();
                println!("Rename cancelled.");
            }
            Command::Delete(target) => {
                if let Some(session_id) = resolve(&synchronizer, &target) {
                    let request = synchronizer.request_delete(&session_id);
                    println!("{} [y/N]", request.prompt());
                    pending_delete = Some(request);
                }
            }
        }
    }

    Ok(())
}

fn resolve(synchronizer: &SessionSynchronizer, target: &Target) -> Option<String> {
    let resolved = target.resolve(&synchronizer.sessions());
    if resolved.is_none() {
        println!("No chat at that position. Use /list to see them.");
    }
    resolved
}

fn spawn_rendered<F>(synchronizer: &SessionSynchronizer, operation: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    let sync = synchronizer.clone();
    tokio::spawn(async move {
        operation.await;
        view::render(&sync.snapshot());
    });
}
