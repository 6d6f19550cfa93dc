use std::io::Write;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::render::TerminalCommand;

/// Writes terminal commands on its own thread so pacing never holds the
/// dispatch loop.
pub struct Printer {
    tx: mpsc::Sender<TerminalCommand>,
    handle: JoinHandle<()>,
}

impl Printer {
    pub fn spawn(pacing: Duration, mut out: Box<dyn Write + Send>) -> Self {
        let (tx, rx) = mpsc::channel::<TerminalCommand>();
        let handle = thread::spawn(move || {
            for cmd in rx {
                let _ = match cmd {
                    TerminalCommand::Status(text) => writeln!(out, "* {text}"),
                    TerminalCommand::Line { text, paced } => {
                        if paced {
                            thread::sleep(pacing);
                        }
                        writeln!(out, "{text}")
                    }
                };
                let _ = out.flush();
            }
        });
        Self { tx, handle }
    }

    pub fn sender(&self) -> mpsc::Sender<TerminalCommand> {
        self.tx.clone()
    }

    /// Waits until everything queued so far has been written. Every sender
    /// handed out must be dropped first, or this blocks.
    pub fn finish(self) {
        drop(self.tx);
        let _ = self.handle.join();
    }
}
