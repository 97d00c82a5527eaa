//! Recording test doubles for the capability traits.
//!
//! Every double writes into one shared [`EffectLog`], so tests can assert the
//! relative order of speech, actuation and planner calls.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{ActuationError, GuideError, Result};
use crate::pose::Pose;
use crate::request::GlowColor;
use crate::traits::{ActuationResult, Actuator, CapturedImage, Listener, Planner, Speaker};
use crate::world::{WorldMap, WorldObject};

/// One observable side effect.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Preamble(String),
    Asked(String),
    AskedWithImage(String),
    Spoke(String),
    Forward(f64),
    Sideways(f64),
    Turned(f64),
    TurnedToward(String),
    PickedUp(String),
    Dropped,
    Glow(GlowColor),
    CapturedImage,
    PassedDoorway(String),
    Piloted(Pose),
}

/// Shared, ordered record of effects.
#[derive(Debug, Clone, Default)]
pub struct EffectLog(Arc<Mutex<Vec<Effect>>>);

impl EffectLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, effect: Effect) {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).push(effect);
    }

    /// Copy of everything recorded so far.
    pub fn snapshot(&self) -> Vec<Effect> {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Only the spoken utterances, in order.
    pub fn spoken(&self) -> Vec<String> {
        self.snapshot()
            .into_iter()
            .filter_map(|effect| match effect {
                Effect::Spoke(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Effects other than speech and planner traffic.
    pub fn actuations(&self) -> Vec<Effect> {
        self.snapshot()
            .into_iter()
            .filter(|effect| {
                !matches!(
                    effect,
                    Effect::Spoke(_)
                        | Effect::Preamble(_)
                        | Effect::Asked(_)
                        | Effect::AskedWithImage(_)
                )
            })
            .collect()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

/// Planner that replays canned responses.
pub struct ScriptedPlanner {
    log: EffectLog,
    responses: VecDeque<Result<String>>,
}

impl ScriptedPlanner {
    pub fn new(log: EffectLog) -> Self {
        Self {
            log,
            responses: VecDeque::new(),
        }
    }

    /// Queues the next response.
    pub fn respond(mut self, response: impl Into<String>) -> Self {
        self.responses.push_back(Ok(response.into()));
        self
    }

    /// Queues a planner failure.
    pub fn fail(mut self, message: impl Into<String>) -> Self {
        self.responses.push_back(Err(GuideError::Planner(message.into())));
        self
    }

    fn next_response(&mut self) -> Result<String> {
        self.responses
            .pop_front()
            .unwrap_or_else(|| Err(GuideError::Planner("no scripted response left".into())))
    }
}

#[async_trait]
impl Planner for ScriptedPlanner {
    fn set_preamble(&mut self, preamble: &str) {
        self.log.push(Effect::Preamble(preamble.to_string()));
    }

    async fn ask(&mut self, utterance: &str) -> Result<String> {
        self.log.push(Effect::Asked(utterance.to_string()));
        self.next_response()
    }

    async fn ask_with_image(&mut self, instruction: &str, _image: &CapturedImage) -> Result<String> {
        self.log.push(Effect::AskedWithImage(instruction.to_string()));
        self.next_response()
    }
}

/// Actuator and world map that record every primitive call.
///
/// Failures are injected per primitive name (`"pilot_to_pose"`, `"pick_up"`,
/// ...). The attempt is recorded before the injected failure is returned.
pub struct RecordingRobot {
    log: EffectLog,
    pose: Pose,
    objects: HashMap<String, WorldObject>,
    failures: HashMap<&'static str, ActuationError>,
}

impl RecordingRobot {
    pub fn new(log: EffectLog) -> Self {
        Self {
            log,
            pose: Pose::default(),
            objects: HashMap::new(),
            failures: HashMap::new(),
        }
    }

    pub fn with_pose(mut self, pose: Pose) -> Self {
        self.pose = pose;
        self
    }

    pub fn with_object(mut self, object: WorldObject) -> Self {
        self.objects.insert(object.id.clone(), object);
        self
    }

    pub fn with_failure(mut self, primitive: &'static str, error: ActuationError) -> Self {
        self.failures.insert(primitive, error);
        self
    }

    pub fn log(&self) -> EffectLog {
        self.log.clone()
    }

    fn record(&self, primitive: &'static str, effect: Effect) -> ActuationResult {
        self.log.push(effect);
        match self.failures.get(primitive) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Actuator for RecordingRobot {
    async fn move_forward(&self, distance_mm: f64) -> ActuationResult {
        self.record("move_forward", Effect::Forward(distance_mm))
    }

    async fn move_sideways(&self, distance_mm: f64) -> ActuationResult {
        self.record("move_sideways", Effect::Sideways(distance_mm))
    }

    async fn turn(&self, angle_deg: f64) -> ActuationResult {
        self.record("turn", Effect::Turned(angle_deg))
    }

    async fn turn_toward(&self, object_id: &str) -> ActuationResult {
        self.record("turn_toward", Effect::TurnedToward(object_id.to_string()))
    }

    async fn pick_up(&self, object_id: &str) -> ActuationResult {
        self.record("pick_up", Effect::PickedUp(object_id.to_string()))
    }

    async fn drop_object(&self) -> ActuationResult {
        self.record("drop_object", Effect::Dropped)
    }

    async fn set_glow(&self, color: GlowColor) -> ActuationResult {
        self.record("set_glow", Effect::Glow(color))
    }

    async fn capture_image(&self) -> std::result::Result<CapturedImage, ActuationError> {
        self.record("capture_image", Effect::CapturedImage)?;
        Ok(CapturedImage::new(vec![0xff, 0xd8, 0xff], "image/jpeg"))
    }

    async fn pass_doorway(&self, doorway: &str) -> ActuationResult {
        self.record("pass_doorway", Effect::PassedDoorway(doorway.to_string()))
    }

    async fn pilot_to_pose(&self, goal: Pose) -> ActuationResult {
        self.record("pilot_to_pose", Effect::Piloted(goal))
    }
}

impl WorldMap for RecordingRobot {
    fn find_object(&self, id: &str) -> Option<WorldObject> {
        self.objects.get(id).cloned()
    }

    fn current_pose(&self) -> Pose {
        self.pose
    }
}

/// Speech sink that records utterances.
pub struct RecordingSpeaker {
    log: EffectLog,
    failing: bool,
}

impl RecordingSpeaker {
    pub fn new(log: EffectLog) -> Self {
        Self {
            log,
            failing: false,
        }
    }

    /// A speaker whose every call fails.
    pub fn failing(log: EffectLog) -> Self {
        Self { log, failing: true }
    }
}

#[async_trait]
impl Speaker for RecordingSpeaker {
    async fn speak(&self, text: &str) -> Result<()> {
        if self.failing {
            return Err(GuideError::Speech("speaker offline".into()));
        }
        self.log.push(Effect::Spoke(text.to_string()));
        Ok(())
    }
}

/// Listener that replays canned utterances, then closes.
pub struct ScriptedListener {
    utterances: VecDeque<String>,
}

impl ScriptedListener {
    pub fn new<I, S>(utterances: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            utterances: utterances.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl Listener for ScriptedListener {
    async fn hear(&mut self) -> Result<Option<String>> {
        Ok(self.utterances.pop_front())
    }
}
