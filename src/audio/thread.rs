use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use rodio::OutputStreamBuilder;
use rodio::mixer::Mixer;
use tracing::{debug, warn};

use super::types::EngineError;

/// Owns the platform output stream on its own thread.
///
/// The stream itself is not `Send` on every platform, so it never leaves the
/// thread that opened it. Callers get the stream's mixer, which is. The
/// stream stays open until this handle is dropped.
pub(super) struct OutputThread {
    quit: Option<Sender<()>>,
    join: Option<JoinHandle<()>>,
}

impl OutputThread {
    pub(super) fn spawn() -> Result<(Self, Mixer), EngineError> {
        let (ready_tx, ready_rx) = mpsc::channel::<Result<Mixer, EngineError>>();
        let (quit_tx, quit_rx) = mpsc::channel::<()>();

        let join = thread::Builder::new()
            .name("cadenza-output".to_string())
            .spawn(move || {
                let mut stream = match OutputStreamBuilder::open_default_stream() {
                    Ok(s) => s,
                    Err(e) => {
                        let _ = ready_tx.send(Err(EngineError::Output(e.to_string())));
                        return;
                    }
                };
                // rodio logs to stderr when OutputStream is dropped.
                stream.log_on_drop(false);

                if ready_tx.send(Ok(stream.mixer().clone())).is_err() {
                    return;
                }
                debug!("audio output stream opened");

                // Returns once the sender is dropped or a quit is sent.
                let _ = quit_rx.recv();
                debug!("audio output stream closing");
            })
            .map_err(|e| EngineError::Output(e.to_string()))?;

        let mixer = ready_rx
            .recv()
            .map_err(|_| EngineError::Output("output thread exited during start-up".to_string()))??;

        Ok((
            Self {
                quit: Some(quit_tx),
                join: Some(join),
            },
            mixer,
        ))
    }
}

impl Drop for OutputThread {
    fn drop(&mut self) {
        if let Some(tx) = self.quit.take() {
            let _ = tx.send(());
        }
        if let Some(h) = self.join.take() {
            if h.join().is_err() {
                warn!("audio output thread panicked");
            }
        }
    }
}
