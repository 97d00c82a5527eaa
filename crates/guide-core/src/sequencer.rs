//! Command sequencer.
//!
//! Drains a [`CommandQueue`] one line at a time. Each line is routed through
//! the [`DispatchTable`], parsed into an [`ActionRequest`] and executed against
//! the [`Actuator`]. Whatever the outcome, control comes back here and the
//! next line runs; failures are recovered locally and never end the queue.
//!
//! A `camera` line is the one exception: after a successful capture the
//! sequencer stops and hands the image back so the conversation can re-ask
//! the planner. Once the conversation has run out of follow-ups the sequencer
//! is built with [`Sequencer::without_camera_followup`], and a capture then
//! completes like any other command.

use tracing::{debug, info, warn};

use crate::command::{CommandKind, CommandLine, CommandQueue, DispatchTable};
use crate::config::GuideConfig;
use crate::outcome::{ActionOutcome, FailureReason, Recovery};
use crate::request::ActionRequest;
use crate::traits::{Actuator, CapturedImage, Speaker};
use crate::world::WorldMap;

/// Counters describing one conversation turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnReport {
    /// Utterances handed to the speaker, apologies included.
    pub speech_acts: usize,
    /// Commands that completed.
    pub completed: usize,
    /// Commands that failed and were recovered.
    pub recovered: usize,
    /// Marked lines no table entry recognized.
    pub ignored: usize,
    /// Planner re-queries triggered by the camera.
    pub camera_rounds: usize,
    /// Lines dropped because a camera follow-up replaced their queue.
    pub discarded: usize,
}

/// How a queue run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceEnd {
    /// Every line was processed.
    Exhausted,
    /// A camera image was captured; the planner should be asked again.
    CameraFollowUp {
        image: CapturedImage,
        /// Lines still queued behind the camera command.
        discarded: usize,
    },
}

/// Result of executing one routed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The command finished, successfully or not.
    Done(ActionOutcome),
    /// The camera produced an image.
    Captured(CapturedImage),
}

/// Executes command queues against the robot's capabilities.
pub struct Sequencer<'a> {
    table: &'a DispatchTable,
    actuator: &'a dyn Actuator,
    world: &'a dyn WorldMap,
    speaker: &'a dyn Speaker,
    config: &'a GuideConfig,
    camera_followup: bool,
}

impl<'a> Sequencer<'a> {
    /// Creates a sequencer over borrowed capabilities.
    pub fn new(
        table: &'a DispatchTable,
        actuator: &'a dyn Actuator,
        world: &'a dyn WorldMap,
        speaker: &'a dyn Speaker,
        config: &'a GuideConfig,
    ) -> Self {
        Self {
            table,
            actuator,
            world,
            speaker,
            config,
            camera_followup: true,
        }
    }

    /// Keeps draining the queue after a capture instead of stopping for a
    /// planner follow-up.
    pub fn without_camera_followup(mut self) -> Self {
        self.camera_followup = false;
        self
    }

    /// Runs the queue to exhaustion or to a camera follow-up.
    pub async fn run(&self, mut queue: CommandQueue, report: &mut TurnReport) -> SequenceEnd {
        debug!(lines = queue.len(), "dispatching command queue");

        while let Some(line) = queue.next_line() {
            let kind = self.table.resolve(&line);
            debug!(%kind, line = %line, "dispatch");

            if kind == CommandKind::Unrecognized {
                warn!(line = %line, "ignoring unrecognized command");
                report.ignored += 1;
                continue;
            }

            match self.execute(kind, &line).await {
                Step::Done(outcome) => self.recover(kind, &line, &outcome, report).await,
                Step::Captured(image) => {
                    report.completed += 1;
                    if !self.camera_followup {
                        info!("camera follow-up limit reached, continuing queue");
                        continue;
                    }
                    let discarded = queue.len();
                    if discarded > 0 {
                        warn!(discarded, "camera follow-up replaces remaining commands");
                    }
                    return SequenceEnd::CameraFollowUp { image, discarded };
                }
            }
        }

        SequenceEnd::Exhausted
    }

    /// Parses and performs a single routed line.
    pub async fn execute(&self, kind: CommandKind, line: &CommandLine) -> Step {
        match ActionRequest::parse(kind, line, self.config) {
            Ok(request) => self.perform(request).await,
            Err(err) => Step::Done(ActionOutcome::Failed(err.into())),
        }
    }

    async fn perform(&self, request: ActionRequest) -> Step {
        let outcome = match request {
            ActionRequest::Say { text } => self
                .speaker
                .speak(&text)
                .await
                .map_err(|err| FailureReason::Actuator(err.to_string()))
                .into(),
            ActionRequest::Forward { distance_mm } => {
                self.actuator.move_forward(distance_mm).await.into()
            }
            ActionRequest::Sideways { distance_mm } => {
                self.actuator.move_sideways(distance_mm).await.into()
            }
            ActionRequest::Turn { angle_deg } => self.actuator.turn(angle_deg).await.into(),
            ActionRequest::TurnToward { object_id } => {
                self.actuator.turn_toward(&object_id).await.into()
            }
            ActionRequest::PickUp { object_id } => self.actuator.pick_up(&object_id).await.into(),
            ActionRequest::Drop => self.actuator.drop_object().await.into(),
            ActionRequest::Glow(color) => {
                // Glow degrades instead of failing the turn.
                if let Err(err) = self.actuator.set_glow(color).await {
                    warn!(%color, error = %err, "glow request failed");
                }
                ActionOutcome::Completed
            }
            ActionRequest::Camera => {
                return match self.actuator.capture_image().await {
                    Ok(image) => Step::Captured(image),
                    Err(err) => Step::Done(ActionOutcome::Failed(err.into())),
                };
            }
            ActionRequest::DoorPass { doorway } => {
                self.actuator.pass_doorway(&doorway).await.into()
            }
            ActionRequest::PilotToMarker { marker_id } => self.pilot_to_marker(&marker_id).await,
        };
        Step::Done(outcome)
    }

    /// Looks the marker up and pilots to a goal in front of it.
    async fn pilot_to_marker(&self, marker_id: &str) -> ActionOutcome {
        let marker = match self.world.find_object(marker_id) {
            Some(object) if object.is_marker() => object,
            _ => {
                warn!(marker = %marker_id, "no such marker in world map");
                return ActionOutcome::Failed(FailureReason::NotFound(marker_id.to_string()));
            }
        };

        let heading = self.world.current_pose().theta;
        let goal = marker.pose.standoff(self.config.marker_standoff_mm, heading);
        info!(marker = %marker_id, %goal, "piloting to marker");

        self.actuator.pilot_to_pose(goal).await.into()
    }

    async fn recover(
        &self,
        kind: CommandKind,
        line: &CommandLine,
        outcome: &ActionOutcome,
        report: &mut TurnReport,
    ) {
        let Some(reason) = outcome.failure() else {
            report.completed += 1;
            if kind == CommandKind::Say {
                report.speech_acts += 1;
            }
            return;
        };

        report.recovered += 1;
        warn!(%kind, line = %line, %reason, "command failed");

        if let Recovery::Apologize(message) = Recovery::for_failure(kind, reason) {
            match self.speaker.speak(message).await {
                Ok(()) => report.speech_acts += 1,
                Err(err) => warn!(error = %err, "could not speak recovery message"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ActuationError;
    use crate::mock::{Effect, EffectLog, RecordingRobot, RecordingSpeaker};
    use crate::outcome::{DOORWAY_APOLOGY, MARKER_NOT_FOUND, MARKER_UNREACHABLE};
    use crate::pose::Pose;
    use crate::world::{ObjectKind, WorldObject};

    fn queue(lines: &[&str]) -> CommandQueue {
        lines.iter().map(|l| CommandLine::new(*l)).collect()
    }

    async fn run(robot: &RecordingRobot, lines: &[&str]) -> (SequenceEnd, TurnReport) {
        let speaker = RecordingSpeaker::new(robot.log());
        let config = GuideConfig::default();
        let sequencer = Sequencer::new(
            DispatchTable::standard(),
            robot,
            robot,
            &speaker,
            &config,
        );
        let mut report = TurnReport::default();
        let end = sequencer.run(queue(lines), &mut report).await;
        (end, report)
    }

    #[tokio::test]
    async fn test_effects_follow_queue_order() {
        let robot = RecordingRobot::new(EffectLog::new());
        let (end, report) = run(
            &robot,
            &["#forward 200", "#say Let me see that.", "#turn 90", "#drop"],
        )
        .await;

        assert_eq!(end, SequenceEnd::Exhausted);
        assert_eq!(
            robot.log().snapshot(),
            vec![
                Effect::Forward(200.0),
                Effect::Spoke("Let me see that.".into()),
                Effect::Turned(90.0),
                Effect::Dropped,
            ]
        );
        assert_eq!(report.completed, 4);
        assert_eq!(report.speech_acts, 1);
    }

    #[tokio::test]
    async fn test_parse_failure_does_not_stop_queue() {
        let robot = RecordingRobot::new(EffectLog::new());
        let (_, report) = run(&robot, &["#forward far", "#turn 45"]).await;

        assert_eq!(robot.log().snapshot(), vec![Effect::Turned(45.0)]);
        assert_eq!(report.recovered, 1);
        assert_eq!(report.completed, 1);
    }

    #[tokio::test]
    async fn test_silent_recovery_for_pickup() {
        let robot = RecordingRobot::new(EffectLog::new())
            .with_failure("pick_up", ActuationError::Failed("nothing there".into()));
        let (_, report) = run(&robot, &["#pickup OrangeBarrel.a", "#say Oops"]).await;

        assert_eq!(
            robot.log().snapshot(),
            vec![
                Effect::PickedUp("OrangeBarrel.a".into()),
                Effect::Spoke("Oops".into()),
            ]
        );
        assert_eq!(report.recovered, 1);
    }

    #[tokio::test]
    async fn test_doorpass_actuator_failure_apologizes() {
        let robot = RecordingRobot::new(EffectLog::new())
            .with_failure("pass_doorway", ActuationError::Failed("closed".into()));
        run(&robot, &["#doorpass Doorway-2:0.a"]).await;

        assert_eq!(
            robot.log().snapshot(),
            vec![
                Effect::PassedDoorway("Doorway-2:0.a".into()),
                Effect::Spoke(DOORWAY_APOLOGY.into()),
            ]
        );
    }

    #[tokio::test]
    async fn test_pilot_goal_faces_marker_with_robot_heading() {
        let robot = RecordingRobot::new(EffectLog::new())
            .with_pose(Pose::new(0.0, 0.0, 0.5))
            .with_object(WorldObject::new(
                "ArucoMarker-2.a",
                ObjectKind::ArucoMarker,
                Pose::new(1000.0, 0.0, 0.0),
            ));
        let (_, report) = run(&robot, &["#pilottoaruco 2"]).await;

        assert_eq!(
            robot.log().snapshot(),
            vec![Effect::Piloted(Pose::new(1100.0, 0.0, 0.5))]
        );
        assert_eq!(report.completed, 1);
    }

    #[tokio::test]
    async fn test_pilot_to_non_marker_is_not_found() {
        let robot = RecordingRobot::new(EffectLog::new()).with_object(WorldObject::new(
            "ArucoMarker-3.a",
            ObjectKind::Wall,
            Pose::default(),
        ));
        run(&robot, &["#pilottoaruco 3"]).await;

        assert_eq!(
            robot.log().snapshot(),
            vec![Effect::Spoke(MARKER_NOT_FOUND.into())]
        );
    }

    #[tokio::test]
    async fn test_pilot_unreachable() {
        let robot = RecordingRobot::new(EffectLog::new())
            .with_object(WorldObject::new(
                "ArucoMarker-1.a",
                ObjectKind::ArucoMarker,
                Pose::new(10.0, 0.0, 0.0),
            ))
            .with_failure(
                "pilot_to_pose",
                ActuationError::GoalUnreachable("blocked".into()),
            );
        run(&robot, &["#pilottoaruco ArucoMarker-1.a"]).await;

        let log = robot.log().snapshot();
        assert_eq!(log.len(), 2);
        assert_eq!(log[1], Effect::Spoke(MARKER_UNREACHABLE.into()));
    }

    #[tokio::test]
    async fn test_glow_never_fails() {
        let robot = RecordingRobot::new(EffectLog::new())
            .with_failure("set_glow", ActuationError::Failed("no leds".into()));
        let (_, report) = run(&robot, &["#glow red"]).await;

        assert_eq!(
            robot.log().snapshot(),
            vec![Effect::Glow(crate::request::GlowColor::Off)]
        );
        assert_eq!(report.completed, 1);
        assert_eq!(report.recovered, 0);
    }

    #[tokio::test]
    async fn test_camera_stops_queue() {
        let robot = RecordingRobot::new(EffectLog::new());
        let (end, report) = run(&robot, &["#say Looking.", "#camera", "#turn 10"]).await;

        match end {
            SequenceEnd::CameraFollowUp { discarded, .. } => assert_eq!(discarded, 1),
            other => panic!("expected camera follow-up, got {other:?}"),
        }
        assert_eq!(
            robot.log().snapshot(),
            vec![Effect::Spoke("Looking.".into()), Effect::CapturedImage]
        );
        assert_eq!(report.completed, 2);
    }

    #[tokio::test]
    async fn test_camera_failure_continues_queue() {
        let robot = RecordingRobot::new(EffectLog::new())
            .with_failure("capture_image", ActuationError::Failed("lens cap".into()));
        let (end, report) = run(&robot, &["#camera", "#turn 10"]).await;

        assert_eq!(end, SequenceEnd::Exhausted);
        assert_eq!(
            robot.log().snapshot(),
            vec![Effect::CapturedImage, Effect::Turned(10.0)]
        );
        assert_eq!(report.recovered, 1);
    }

    #[tokio::test]
    async fn test_unrecognized_lines_are_skipped() {
        let robot = RecordingRobot::new(EffectLog::new());
        let (end, report) = run(&robot, &["#bogus foo", "#dance"]).await;

        assert_eq!(end, SequenceEnd::Exhausted);
        assert!(robot.log().snapshot().is_empty());
        assert_eq!(report.ignored, 2);
    }

    #[tokio::test]
    async fn test_execute_camera_hands_back_image() {
        let robot = RecordingRobot::new(EffectLog::new());
        let speaker = RecordingSpeaker::new(robot.log());
        let config = GuideConfig::default();
        let sequencer = Sequencer::new(
            DispatchTable::standard(),
            &robot,
            &robot,
            &speaker,
            &config,
        );

        let step = sequencer
            .execute(CommandKind::Camera, &CommandLine::new("#camera"))
            .await;
        assert!(matches!(step, Step::Captured(ref image) if !image.bytes.is_empty()));
    }

    #[tokio::test]
    async fn test_capture_without_followup_continues_queue() {
        let robot = RecordingRobot::new(EffectLog::new());
        let speaker = RecordingSpeaker::new(robot.log());
        let config = GuideConfig::default();
        let sequencer = Sequencer::new(
            DispatchTable::standard(),
            &robot,
            &robot,
            &speaker,
            &config,
        )
        .without_camera_followup();

        let mut report = TurnReport::default();
        let end = sequencer
            .run(queue(&["#camera", "#say Still looking.", "#turn 90"]), &mut report)
            .await;

        assert_eq!(end, SequenceEnd::Exhausted);
        assert_eq!(
            robot.log().snapshot(),
            vec![
                Effect::CapturedImage,
                Effect::Spoke("Still looking.".into()),
                Effect::Turned(90.0),
            ]
        );
        assert_eq!(report.completed, 3);
        assert_eq!(report.discarded, 0);
    }
}
