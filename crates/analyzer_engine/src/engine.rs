use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use analyzer_core::{AnalysisFailure, AnalysisKind, Generation};
use analyzer_logging::{analyzer_debug, analyzer_info};
use tokio::sync::mpsc as async_mpsc;
use tokio_util::sync::CancellationToken;

use crate::pipeline::AnalysisPipeline;
use crate::{EngineEvent, EngineStopped};

enum EngineCommand {
    Run {
        generation: Generation,
        kind: AnalysisKind,
    },
    Ask {
        generation: Generation,
        question: String,
    },
}

/// Runs pipelines on a dedicated thread with a single-threaded runtime and
/// reports completions as [`EngineEvent`]s.
pub struct EngineHandle {
    cmd_tx: async_mpsc::UnboundedSender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    shutdown: CancellationToken,
}

impl EngineHandle {
    /// `build` runs on the engine thread inside the runtime, so it may spawn
    /// tasks (e.g. a relay listener).
    pub fn new<B>(build: B) -> io::Result<Self>
    where
        B: FnOnce() -> AnalysisPipeline + Send + 'static,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let (cmd_tx, mut cmd_rx) = async_mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel();
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();

        thread::spawn(move || {
            runtime.block_on(async move {
                let pipeline = Arc::new(build());
                loop {
                    tokio::select! {
                        _ = token.cancelled() => break,
                        command = cmd_rx.recv() => match command {
                            Some(command) => spawn_command(
                                pipeline.clone(),
                                command,
                                event_tx.clone(),
                                token.child_token(),
                            ),
                            None => break,
                        },
                    }
                }
                analyzer_info!("Analysis engine stopped");
            });
        });

        Ok(Self {
            cmd_tx,
            event_rx,
            shutdown,
        })
    }

    pub fn start(&self, generation: Generation, kind: AnalysisKind) {
        let _ = self.cmd_tx.send(EngineCommand::Run { generation, kind });
    }

    pub fn ask(&self, generation: Generation, question: String) {
        let _ = self.cmd_tx.send(EngineCommand::Ask {
            generation,
            question,
        });
    }

    /// `Ok(None)` when nothing is ready yet. Once the engine thread has
    /// exited no event can ever arrive, which is reported as [`EngineStopped`].
    pub fn try_recv(&self) -> Result<Option<EngineEvent>, EngineStopped> {
        match self.event_rx.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::TryRecvError::Empty) => Ok(None),
            Err(mpsc::TryRecvError::Disconnected) => Err(EngineStopped),
        }
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<EngineEvent>, EngineStopped> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(EngineStopped),
        }
    }

    /// Cancels in-flight runs and stops the engine thread.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn spawn_command(
    pipeline: Arc<AnalysisPipeline>,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
    cancel: CancellationToken,
) {
    tokio::spawn(async move {
        match command {
            EngineCommand::Run { generation, kind } => {
                analyzer_debug!("Starting analysis generation={} kind={:?}", generation, kind);
                tokio::select! {
                    _ = cancel.cancelled() => {
                        analyzer_debug!("Analysis generation={} cancelled", generation);
                    }
                    outcome = pipeline.run(kind) => {
                        let _ = event_tx.send(EngineEvent::AnalysisCompleted {
                            generation,
                            outcome: outcome.map_err(AnalysisFailure::from),
                        });
                    }
                }
            }
            EngineCommand::Ask {
                generation,
                question,
            } => {
                analyzer_debug!("Starting question generation={}", generation);
                tokio::select! {
                    _ = cancel.cancelled() => {
                        analyzer_debug!("Question generation={} cancelled", generation);
                    }
                    outcome = pipeline.ask(&question) => {
                        let _ = event_tx.send(EngineEvent::QuestionAnswered {
                            generation,
                            outcome: outcome.map_err(AnalysisFailure::from),
                        });
                    }
                }
            }
        }
    });
}
