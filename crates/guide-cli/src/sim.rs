//! Simulated robot for running the guide without hardware.
//!
//! The simulation tracks the robot's pose and what it holds, and narrates
//! each primitive on stdout. The world map comes from a JSON file:
//!
//! ```json
//! {
//!   "robot": { "x": 0, "y": 0, "theta": 0 },
//!   "max_pilot_distance_mm": 5000,
//!   "objects": [
//!     { "id": "ArucoMarker-1.a", "kind": "aruco_marker", "pose": { "x": 1200, "y": 0 } }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use guide_core::{
    ActuationError, ActuationResult, Actuator, CapturedImage, GlowColor, ObjectKind, Pose,
    WorldMap, WorldObject,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CliError, Result};

/// Furthest the simulated robot will pilot in one request.
pub const DEFAULT_MAX_PILOT_DISTANCE_MM: f64 = 5000.0;

/// Serialized world map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldFile {
    /// Robot start pose.
    #[serde(default)]
    pub robot: Pose,
    #[serde(default = "default_max_pilot_distance")]
    pub max_pilot_distance_mm: f64,
    #[serde(default)]
    pub objects: Vec<WorldObject>,
}

fn default_max_pilot_distance() -> f64 {
    DEFAULT_MAX_PILOT_DISTANCE_MM
}

impl WorldFile {
    /// Loads a world map from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| CliError::WorldFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// A small gallery with four markers, a doorway and a barrel.
    pub fn museum() -> Self {
        let marker = |n: u32, x: f64, y: f64, theta: f64| {
            WorldObject::new(
                format!("ArucoMarker-{}.a", n),
                ObjectKind::ArucoMarker,
                Pose::new(x, y, theta),
            )
        };
        Self {
            robot: Pose::default(),
            max_pilot_distance_mm: DEFAULT_MAX_PILOT_DISTANCE_MM,
            objects: vec![
                marker(1, 1200.0, 0.0, std::f64::consts::PI),
                marker(2, 0.0, 1500.0, -std::f64::consts::FRAC_PI_2),
                marker(3, -1200.0, 0.0, 0.0),
                marker(4, 9000.0, 9000.0, 0.0),
                WorldObject::new(
                    "Doorway-0:1.a",
                    ObjectKind::Doorway,
                    Pose::new(0.0, -1500.0, -std::f64::consts::FRAC_PI_2),
                ),
                WorldObject::new(
                    "OrangeBarrel.a",
                    ObjectKind::Barrel,
                    Pose::new(600.0, 400.0, 0.0),
                ),
            ],
        }
    }
}

#[derive(Debug)]
struct SimState {
    pose: Pose,
    holding: Option<String>,
    glow: GlowColor,
}

/// Actuator and world map backed by an in-memory simulation.
pub struct SimRobot {
    state: Mutex<SimState>,
    objects: HashMap<String, WorldObject>,
    max_pilot_distance_mm: f64,
    camera_image: Option<PathBuf>,
}

impl SimRobot {
    pub fn new(world: WorldFile) -> Self {
        Self {
            state: Mutex::new(SimState {
                pose: world.robot,
                holding: None,
                glow: GlowColor::Off,
            }),
            objects: world
                .objects
                .into_iter()
                .map(|object| (object.id.clone(), object))
                .collect(),
            max_pilot_distance_mm: world.max_pilot_distance_mm,
            camera_image: None,
        }
    }

    /// Image file returned by the camera primitive.
    pub fn with_camera_image(mut self, path: PathBuf) -> Self {
        self.camera_image = Some(path);
        self
    }

    /// Object currently held, if any.
    pub fn holding(&self) -> Option<String> {
        self.state().holding.clone()
    }

    pub fn glow(&self) -> GlowColor {
        self.state().glow
    }

    fn state(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn object(&self, id: &str) -> std::result::Result<&WorldObject, ActuationError> {
        self.objects
            .get(id)
            .ok_or_else(|| ActuationError::Failed(format!("no object named {}", id)))
    }

    fn narrate(&self, action: impl std::fmt::Display) {
        let pose = self.state().pose;
        info!(%pose, "{}", action);
        println!("  [robot] {} -> {}", action, pose);
    }
}

#[async_trait]
impl Actuator for SimRobot {
    async fn move_forward(&self, distance_mm: f64) -> ActuationResult {
        {
            let mut state = self.state();
            state.pose = state.pose.translated(distance_mm, 0.0);
        }
        self.narrate(format_args!("forward {} mm", distance_mm));
        Ok(())
    }

    async fn move_sideways(&self, distance_mm: f64) -> ActuationResult {
        {
            let mut state = self.state();
            state.pose = state.pose.translated(0.0, distance_mm);
        }
        self.narrate(format_args!("sideways {} mm", distance_mm));
        Ok(())
    }

    async fn turn(&self, angle_deg: f64) -> ActuationResult {
        {
            let mut state = self.state();
            state.pose = state.pose.rotated(angle_deg);
        }
        self.narrate(format_args!("turn {} deg", angle_deg));
        Ok(())
    }

    async fn turn_toward(&self, object_id: &str) -> ActuationResult {
        let target = self.object(object_id)?.pose;
        {
            let mut state = self.state();
            state.pose.theta = state.pose.bearing_to(&target);
        }
        self.narrate(format_args!("turn toward {}", object_id));
        Ok(())
    }

    async fn pick_up(&self, object_id: &str) -> ActuationResult {
        self.object(object_id)?;
        {
            let mut state = self.state();
            if let Some(held) = &state.holding {
                return Err(ActuationError::Failed(format!("already holding {}", held)));
            }
            state.holding = Some(object_id.to_string());
        }
        self.narrate(format_args!("pick up {}", object_id));
        Ok(())
    }

    async fn drop_object(&self) -> ActuationResult {
        let held = self
            .state()
            .holding
            .take()
            .ok_or_else(|| ActuationError::Failed("nothing to drop".into()))?;
        self.narrate(format_args!("drop {}", held));
        Ok(())
    }

    async fn set_glow(&self, color: GlowColor) -> ActuationResult {
        self.state().glow = color;
        self.narrate(format_args!("glow {}", color));
        Ok(())
    }

    async fn capture_image(&self) -> std::result::Result<CapturedImage, ActuationError> {
        let path = self
            .camera_image
            .as_ref()
            .ok_or_else(|| ActuationError::Failed("no camera image configured".into()))?;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ActuationError::Failed(format!("{}: {}", path.display(), e)))?;
        self.narrate(format_args!("camera captured {} bytes", bytes.len()));
        Ok(CapturedImage::new(bytes, media_type(path)))
    }

    async fn pass_doorway(&self, doorway: &str) -> ActuationResult {
        let door = self.object(doorway)?;
        if door.kind != ObjectKind::Doorway {
            return Err(ActuationError::Failed(format!("{} is not a doorway", doorway)));
        }
        let beyond = door.pose.translated(300.0, 0.0);
        self.state().pose = beyond;
        self.narrate(format_args!("pass through {}", doorway));
        Ok(())
    }

    async fn pilot_to_pose(&self, goal: Pose) -> ActuationResult {
        let distance = self.state().pose.distance_to(&goal);
        if distance > self.max_pilot_distance_mm {
            return Err(ActuationError::GoalUnreachable(format!(
                "{:.0} mm away, limit is {:.0} mm",
                distance, self.max_pilot_distance_mm
            )));
        }
        self.state().pose = goal;
        self.narrate(format_args!("pilot to {}", goal));
        Ok(())
    }
}

impl WorldMap for SimRobot {
    fn find_object(&self, id: &str) -> Option<WorldObject> {
        self.objects.get(id).cloned()
    }

    fn current_pose(&self) -> Pose {
        self.state().pose
    }
}

/// Guesses an image MIME type from the file extension.
pub fn media_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}
