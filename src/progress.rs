//! Progress notification plumbing.
//!
//! The scanning core knows nothing about presentation; it only calls an
//! optional hook with human-readable strings. This module bridges that hook
//! to a one-way channel so a foreground loop (CLI printer, GUI shell) can
//! drain messages while a worker thread runs the scan. Sends are
//! fire-and-forget: no acknowledgement, no backpressure, and a vanished
//! receiver is silently ignored.

use std::path::PathBuf;
use std::thread;

use anyhow::Result;
use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::session::AuditSession;

/// Receiving end handed to the presentation loop.
pub type ProgressReceiver = Receiver<String>;

/// Sending end installable as a session progress hook.
#[derive(Debug, Clone)]
pub struct ProgressSender(Sender<String>);

impl ProgressSender {
    pub fn send(&self, message: impl Into<String>) {
        let _ = self.0.send(message.into());
    }

    /// Wires this sender up as `session`'s progress hook.
    pub fn attach(&self, session: &mut AuditSession) {
        let sender = self.clone();
        session.set_progress_hook(move |message| sender.send(message));
    }
}

/// Creates an unbounded progress channel.
pub fn channel() -> (ProgressSender, ProgressReceiver) {
    let (tx, rx) = unbounded();
    (ProgressSender(tx), rx)
}

/// Runs a complete scan on a worker thread, reporting milestones through
/// `progress`. The finished session comes back through the join handle; the
/// scan cannot be cancelled once started.
pub fn spawn_scan(
    root: PathBuf,
    progress: ProgressSender,
) -> thread::JoinHandle<Result<AuditSession>> {
    thread::spawn(move || {
        let mut session = AuditSession::new();
        progress.attach(&mut session);
        session.scan_directory(&root)?;
        Ok(session)
    })
}
