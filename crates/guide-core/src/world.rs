//! World-map lookup.

use serde::{Deserialize, Serialize};

use crate::pose::Pose;

/// What kind of thing a world-map entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    ArucoMarker,
    AprilTag,
    Doorway,
    Wall,
    Barrel,
    Other,
}

/// An entry in the world map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldObject {
    pub id: String,
    pub kind: ObjectKind,
    pub pose: Pose,
}

impl WorldObject {
    /// Creates a world object.
    pub fn new(id: impl Into<String>, kind: ObjectKind, pose: Pose) -> Self {
        Self {
            id: id.into(),
            kind,
            pose,
        }
    }

    /// Returns true for ArUco markers.
    pub fn is_marker(&self) -> bool {
        self.kind == ObjectKind::ArucoMarker
    }
}

/// Read-only view of the robot's world map.
pub trait WorldMap: Send + Sync {
    /// Looks up an object by identifier.
    fn find_object(&self, id: &str) -> Option<WorldObject>;

    /// The robot's own current pose.
    fn current_pose(&self) -> Pose;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_object_from_json() {
        let object: WorldObject = serde_json::from_str(
            r#"{"id":"Doorway-0:1.a","kind":"doorway","pose":{"x":0.0,"y":-1500.0}}"#,
        )
        .unwrap();

        assert_eq!(object.kind, ObjectKind::Doorway);
        assert_eq!(object.pose.theta, 0.0);
        assert!(!object.is_marker());
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&ObjectKind::ArucoMarker).unwrap();
        assert_eq!(json, "\"aruco_marker\"");
    }
}
