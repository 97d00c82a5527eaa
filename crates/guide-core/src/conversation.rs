//! Conversation loop.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::classifier::{classify, Classification};
use crate::command::DispatchTable;
use crate::config::GuideConfig;
use crate::error::{GuideError, Result};
use crate::sequencer::{SequenceEnd, Sequencer, TurnReport};
use crate::traits::{Actuator, Listener, Planner, Speaker};
use crate::world::WorldMap;

/// One guide session: planner, robot and speech wired together.
pub struct Conversation {
    config: GuideConfig,
    table: DispatchTable,
    planner: Box<dyn Planner>,
    actuator: Arc<dyn Actuator>,
    world: Arc<dyn WorldMap>,
    speaker: Arc<dyn Speaker>,
    started: bool,
}

impl Conversation {
    /// Creates a session. Nothing is spoken until [`Conversation::start`].
    pub fn new(
        config: GuideConfig,
        planner: Box<dyn Planner>,
        actuator: Arc<dyn Actuator>,
        world: Arc<dyn WorldMap>,
        speaker: Arc<dyn Speaker>,
    ) -> Self {
        Self {
            config,
            table: DispatchTable::new(),
            planner,
            actuator,
            world,
            speaker,
            started: false,
        }
    }

    /// Session configuration.
    pub fn config(&self) -> &GuideConfig {
        &self.config
    }

    /// Whether the greeting has been given.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Hands the preamble to the planner and speaks the greeting.
    pub async fn start(&mut self) -> Result<()> {
        if self.started {
            return Err(GuideError::AlreadyStarted);
        }

        info!("starting guide session");
        self.planner.set_preamble(&self.config.preamble);
        self.speaker.speak(&self.config.greeting).await?;
        self.started = true;

        Ok(())
    }

    /// Runs one full turn for a human utterance.
    pub async fn handle_utterance(&mut self, utterance: &str) -> Result<TurnReport> {
        if !self.started {
            return Err(GuideError::NotStarted);
        }

        debug!(utterance = %utterance, "asking planner");
        let response = self.planner.ask(utterance).await?;

        let mut report = TurnReport::default();
        self.handle_response(response, &mut report).await?;
        info!(
            speech_acts = report.speech_acts,
            completed = report.completed,
            recovered = report.recovered,
            ignored = report.ignored,
            discarded = report.discarded,
            camera_rounds = report.camera_rounds,
            "turn complete"
        );

        Ok(report)
    }

    /// Speaks or dispatches a planner response, following camera re-queries.
    pub async fn handle_response(
        &mut self,
        mut response: String,
        report: &mut TurnReport,
    ) -> Result<()> {
        loop {
            let queue = match classify(&response) {
                Classification::Speech(text) => {
                    self.speaker.speak(&text).await?;
                    report.speech_acts += 1;
                    return Ok(());
                }
                Classification::Commands(queue) => queue,
            };

            let mut sequencer = Sequencer::new(
                &self.table,
                self.actuator.as_ref(),
                self.world.as_ref(),
                self.speaker.as_ref(),
                &self.config,
            );
            if report.camera_rounds >= self.config.camera_followup_limit {
                warn!(
                    limit = self.config.camera_followup_limit,
                    "camera follow-up limit reached"
                );
                sequencer = sequencer.without_camera_followup();
            }

            let end = sequencer.run(queue, report).await;
            let SequenceEnd::CameraFollowUp { image, discarded } = end else {
                return Ok(());
            };
            report.discarded += discarded;
            report.camera_rounds += 1;

            debug!(round = report.camera_rounds, "re-asking planner with camera image");
            response = self
                .planner
                .ask_with_image(&self.config.camera_instruction, &image)
                .await?;
        }
    }

    /// Greets, then serves utterances until the listener closes.
    ///
    /// A failed turn is logged and the loop keeps listening.
    pub async fn run(&mut self, listener: &mut dyn Listener) -> Result<()> {
        if !self.started {
            self.start().await?;
        }

        while let Some(utterance) = listener.hear().await? {
            let utterance = utterance.trim();
            if utterance.is_empty() {
                continue;
            }

            if let Err(e) = self.handle_utterance(utterance).await {
                error!(error = %e, "turn failed");
            }
        }

        info!("listener closed, ending session");
        Ok(())
    }
}
