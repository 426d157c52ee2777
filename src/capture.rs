use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::{Context, Result};

// ---------------------------------------------------------------------------
// Serial capture worker
// ---------------------------------------------------------------------------
//
// Runs fully isolated from the compute pipeline: a background thread reads
// lines from the serial port, appends them to the capture file and forwards
// them over a channel to the UI log.  Stopping is cooperative; the flag is
// checked once per read, so stop latency is bounded by the read timeout.

/// How long a single serial read may block before re-checking the stop flag.
const READ_TIMEOUT: Duration = Duration::from_secs(2);

/// Pause after opening the port so boards that reset on connect can settle.
const SETTLE_DELAY: Duration = Duration::from_secs(2);

/// What the worker reports back to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// One trimmed, non-empty line as written to the capture file.
    Line(String),
    /// The worker failed; this terminates only the worker.
    Error(String),
    /// The worker exited (after a stop request or an error).
    Stopped,
}

/// Capture session parameters from the capture view.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    pub port: String,
    pub baud: u32,
    pub output: PathBuf,
}

/// Handle to a running capture worker.
pub struct CaptureWorker {
    stop: Arc<AtomicBool>,
    events: Receiver<CaptureEvent>,
    handle: Option<JoinHandle<()>>,
}

impl CaptureWorker {
    /// Spawn the background reader thread.
    pub fn spawn(config: CaptureConfig) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel();

        let worker_stop = Arc::clone(&stop);
        let handle = std::thread::spawn(move || {
            if let Err(e) = capture_loop(&config, &worker_stop, &tx) {
                log::error!("serial capture failed: {e:#}");
                let _ = tx.send(CaptureEvent::Error(format!("{e:#}")));
            }
            let _ = tx.send(CaptureEvent::Stopped);
        });

        CaptureWorker {
            stop,
            events: rx,
            handle: Some(handle),
        }
    }

    /// Ask the worker to stop after its current read.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Drain all pending events without blocking the UI thread.
    pub fn drain_events(&self) -> Vec<CaptureEvent> {
        let mut events = Vec::new();
        loop {
            match self.events.try_recv() {
                Ok(ev) => events.push(ev),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    events.push(CaptureEvent::Stopped);
                    break;
                }
            }
        }
        events
    }
}

impl Drop for CaptureWorker {
    fn drop(&mut self) {
        self.request_stop();
        // Detach rather than join: the thread exits on its own within the
        // read timeout and must not stall UI shutdown.
        self.handle.take();
    }
}

/// Names of the serial ports currently present on the system.
pub fn available_ports() -> Vec<String> {
    match serialport::available_ports() {
        Ok(ports) => ports.into_iter().map(|p| p.port_name).collect(),
        Err(e) => {
            log::error!("could not enumerate serial ports: {e}");
            Vec::new()
        }
    }
}

fn capture_loop(
    config: &CaptureConfig,
    stop: &AtomicBool,
    tx: &Sender<CaptureEvent>,
) -> Result<()> {
    let port = serialport::new(&config.port, config.baud)
        .timeout(READ_TIMEOUT)
        .open()
        .with_context(|| format!("opening serial port {}", config.port))?;
    std::thread::sleep(SETTLE_DELAY);

    let reader = BufReader::new(port);
    let file = File::create(&config.output)
        .with_context(|| format!("creating capture file {}", config.output.display()))?;

    log::info!(
        "capturing from {} at {} baud into {}",
        config.port,
        config.baud,
        config.output.display()
    );
    pump_lines(reader, file, stop, tx)
}

/// Copy lines from `reader` to `sink` and to the event channel until the
/// stop flag is set or the stream ends.  Blank lines are skipped and
/// invalid UTF-8 is replaced rather than treated as an error.
fn pump_lines<R: BufRead, W: Write>(
    mut reader: R,
    mut sink: W,
    stop: &AtomicBool,
    tx: &Sender<CaptureEvent>,
) -> Result<()> {
    let mut buf = Vec::new();
    while !stop.load(Ordering::Relaxed) {
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break, // end of stream
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim();
                if !line.is_empty() {
                    writeln!(sink, "{line}").context("writing capture file")?;
                    let _ = tx.send(CaptureEvent::Line(line.to_string()));
                }
                buf.clear();
            }
            // A timed-out read means no data arrived; keep any partial line
            // already buffered and re-check the stop flag.
            Err(e) if e.kind() == io::ErrorKind::TimedOut => continue,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e).context("reading from serial port"),
        }
    }
    sink.flush().context("flushing capture file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_pump(input: &[u8]) -> (Vec<u8>, Vec<CaptureEvent>) {
        let stop = AtomicBool::new(false);
        let (tx, rx) = mpsc::channel();
        let mut sink = Vec::new();
        pump_lines(Cursor::new(input), &mut sink, &stop, &tx).unwrap();
        drop(tx);
        (sink, rx.try_iter().collect())
    }

    #[test]
    fn lines_are_trimmed_logged_and_newline_terminated() {
        let (sink, events) = run_pump(b"12,0.5\r\n34,0.7\n");
        assert_eq!(sink, b"12,0.5\n34,0.7\n");
        assert_eq!(
            events,
            vec![
                CaptureEvent::Line("12,0.5".into()),
                CaptureEvent::Line("34,0.7".into()),
            ]
        );
    }

    #[test]
    fn blank_lines_are_skipped() {
        let (sink, events) = run_pump(b"\n\r\n100,1.0\n\n");
        assert_eq!(sink, b"100,1.0\n");
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn invalid_utf8_does_not_kill_the_capture() {
        let (sink, events) = run_pump(b"ok\n\xff\xfe\nstill ok\n");
        assert!(sink.ends_with(b"still ok\n"));
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn stop_flag_halts_the_pump() {
        let stop = AtomicBool::new(true);
        let (tx, rx) = mpsc::channel();
        let mut sink = Vec::new();
        pump_lines(Cursor::new(&b"never read\n"[..]), &mut sink, &stop, &tx).unwrap();
        drop(tx);
        assert!(sink.is_empty());
        assert_eq!(rx.try_iter().count(), 0);
    }
}
