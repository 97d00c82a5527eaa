//! Terminal speech output and line input.

use std::path::PathBuf;
use std::sync::mpsc as std_mpsc;
use std::thread;

use async_trait::async_trait;
use guide_core::{GuideError, Listener, Speaker};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use tokio::sync::mpsc;
use tracing::debug;

/// Prints utterances instead of synthesizing them.
pub struct ConsoleSpeaker {
    name: String,
}

impl ConsoleSpeaker {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl Speaker for ConsoleSpeaker {
    async fn speak(&self, text: &str) -> guide_core::Result<()> {
        println!("{}: {}", self.name, text);
        Ok(())
    }
}

enum ReadEvent {
    Line(String),
    Interrupted,
    Closed,
    Failed(String),
}

/// Reads utterances from the terminal with line editing and history.
///
/// The editor lives on its own thread and only prompts when asked to, so the
/// prompt never interleaves with the guide's own output.
pub struct ReplListener {
    requests: std_mpsc::Sender<()>,
    events: mpsc::UnboundedReceiver<ReadEvent>,
}

impl ReplListener {
    /// Creates the editor, loading history from `state_dir` when present.
    pub fn new(state_dir: PathBuf, prompt: impl Into<String>) -> rustyline::Result<Self> {
        let mut editor: Editor<(), DefaultHistory> = Editor::new()?;
        let history_path = state_dir.join("history.txt");
        if history_path.exists() {
            let _ = editor.load_history(&history_path);
        }

        let prompt = prompt.into();
        let (request_tx, request_rx) = std_mpsc::channel::<()>();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        thread::spawn(move || {
            while request_rx.recv().is_ok() {
                let event = match editor.readline(&prompt) {
                    Ok(line) => {
                        let _ = editor.add_history_entry(line.as_str());
                        if std::fs::create_dir_all(&state_dir).is_ok() {
                            let _ = editor.save_history(&history_path);
                        }
                        ReadEvent::Line(line)
                    }
                    Err(ReadlineError::Interrupted) => ReadEvent::Interrupted,
                    Err(ReadlineError::Eof) => ReadEvent::Closed,
                    Err(err) => ReadEvent::Failed(err.to_string()),
                };
                let finished = matches!(event, ReadEvent::Closed | ReadEvent::Failed(_));
                if event_tx.send(event).is_err() || finished {
                    break;
                }
            }
            debug!("line reader stopped");
        });

        Ok(Self {
            requests: request_tx,
            events: event_rx,
        })
    }
}

#[async_trait]
impl Listener for ReplListener {
    async fn hear(&mut self) -> guide_core::Result<Option<String>> {
        if self.requests.send(()).is_err() {
            return Ok(None);
        }

        match self.events.recv().await {
            Some(ReadEvent::Line(line)) => Ok(Some(line)),
            Some(ReadEvent::Interrupted) => {
                println!("^C");
                Ok(Some(String::new()))
            }
            Some(ReadEvent::Closed) | None => {
                println!("^D");
                Ok(None)
            }
            Some(ReadEvent::Failed(err)) => Err(GuideError::Listener(err)),
        }
    }
}
