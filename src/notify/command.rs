use std::io::{self, Write};
use std::process::{Command, Stdio};

use crate::core::batch::DeliveryRequest;
use crate::error::{NotifyError, PulsegramError, Result};
use crate::notify::{Ack, Notifier};

/// Pipes the batch as one JSON document to a user-supplied program's stdin.
///
/// The program's exit status is the delivery verdict: zero acknowledges the
/// batch, anything else rejects it.
pub struct CommandNotifier {
    argv: Vec<String>,
}

impl CommandNotifier {
    pub fn new(argv: Vec<String>) -> Result<Self> {
        if argv.is_empty() || argv[0].is_empty() {
            return Err(PulsegramError::config("notify_command is empty"));
        }
        Ok(Self { argv })
    }
}

impl Notifier for CommandNotifier {
    fn name(&self) -> &'static str {
        "command"
    }

    fn deliver(&self, request: &DeliveryRequest) -> std::result::Result<Ack, NotifyError> {
        let mut payload = serde_json::to_vec(request)
            .map_err(|e| NotifyError::unreachable(format!("could not encode batch: {e}")))?;
        payload.push(b'\n');

        let mut child = Command::new(&self.argv[0])
            .args(&self.argv[1..])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                NotifyError::unreachable(format!("failed to spawn {}: {e}", self.argv[0]))
            })?;

        // The consumer may fill its stderr pipe before it reads a byte of
        // stdin, and a batch can outgrow the stdin pipe; the write and the
        // drain have to run in parallel.
        let stdin = child.stdin.take();
        let writer = std::thread::spawn(move || -> io::Result<()> {
            if let Some(mut stdin) = stdin {
                match stdin.write_all(&payload) {
                    // A consumer that exits before draining stdin still gets
                    // to report its verdict through the exit status below.
                    Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e),
                    _ => {}
                }
            }
            Ok(())
        });

        let output = child.wait_with_output().map_err(|e| {
            NotifyError::unreachable(format!("failed to wait for {}: {e}", self.argv[0]))
        })?;

        match writer.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                return Err(NotifyError::unreachable(format!(
                    "failed to write batch to {}: {e}",
                    self.argv[0]
                )))
            }
            Err(_) => {
                return Err(NotifyError::unreachable(format!(
                    "stdin writer for {} panicked",
                    self.argv[0]
                )))
            }
        }

        if !output.status.success() {
            let status = output
                .status
                .code()
                .and_then(|c| u16::try_from(c).ok())
                .unwrap_or(1);
            let detail = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(NotifyError::rejected(status, detail));
        }

        Ok(Ack::default())
    }
}
