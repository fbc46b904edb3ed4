//! Spinner shown while a remote call is in flight.

use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

const FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
const FRAME_INTERVAL: Duration = Duration::from_millis(80);

/// Animated progress indicator. Starts when created, stops when dropped.
pub struct Spinner {
    stopped: Arc<AtomicBool>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl Spinner {
    pub fn start(message: impl Into<String>) -> Self {
        let message = message.into();
        let stopped = Arc::new(AtomicBool::new(false));
        let flag = stopped.clone();

        let handle = tokio::spawn(async move {
            let mut frame = 0usize;
            while !flag.load(Ordering::Relaxed) {
                print!("\r{} {}", FRAMES[frame % FRAMES.len()], message);
                let _ = io::stdout().flush();
                frame += 1;
                tokio::time::sleep(FRAME_INTERVAL).await;
            }
        });

        Self {
            stopped,
            handle: Some(handle),
        }
    }

    fn stop_internal(&mut self) {
        self.stopped.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        // Clear the spinner line
        print!("\r\x1b[K");
        let _ = io::stdout().flush();
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.stop_internal();
    }
}

/// Run a future with a spinner on screen
pub async fn with_spinner<F, T>(message: impl Into<String>, future: F) -> T
where
    F: std::future::Future<Output = T>,
{
    let _spinner = Spinner::start(message);
    future.await
}
