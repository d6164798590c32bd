//! Pose data: the fixed-length joint vector, the emotion → pose store loaded
//! at startup, and the frames handed to a [`PoseSink`].

pub mod sink;

use crate::emotion::EmotionTag;
use crate::error::PoseStoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use strum::{EnumCount, IntoEnumIterator};

pub use sink::{LogPoseSink, MemoryPoseSink, PoseSink, TcpPoseSink};

/// Number of joints in every pose.
pub const POSE_LEN: usize = 15;

/// Joint order shared with the renderer. Changing it breaks every consumer.
pub const JOINT_NAMES: [&str; POSE_LEN] = [
    "neck_yaw",
    "neck_pitch",
    "jaw",
    "right_eye",
    "right_eye_mimic",
    "eye_yaw",
    "eye_pitch",
    "right_eyebrow_up",
    "right_eyebrow_roll",
    "left_eye",
    "left_eye_mimic",
    "left_eye_yaw",
    "left_eye_pitch",
    "left_eyebrow_up",
    "left_eyebrow_roll",
];

pub const JAW_INDEX: usize = 2;

/// Eyelid joints moved together by the flutter embellishment.
pub const EYE_INDICES: [usize; 4] = [3, 4, 9, 10];

/// One facial configuration in [`JOINT_NAMES`] order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PoseVector([f64; POSE_LEN]);

impl PoseVector {
    pub fn new(positions: [f64; POSE_LEN]) -> Self {
        Self(positions)
    }

    pub fn positions(&self) -> &[f64; POSE_LEN] {
        &self.0
    }

    pub fn jaw(&self) -> f64 {
        self.0[JAW_INDEX]
    }

    /// Copy of this pose with the jaw joint replaced.
    pub fn with_jaw(mut self, jaw: f64) -> Self {
        self.0[JAW_INDEX] = jaw;
        self
    }

    /// Copy of this pose with both eyes opened to `value`.
    pub fn with_eyes(mut self, value: f64) -> Self {
        for index in EYE_INDICES {
            self.0[index] = value;
        }
        self
    }
}

impl TryFrom<Vec<f64>> for PoseVector {
    type Error = usize;

    /// Fails with the offending length.
    fn try_from(positions: Vec<f64>) -> Result<Self, Self::Error> {
        let len = positions.len();
        let array: [f64; POSE_LEN] = positions.try_into().map_err(|_| len)?;
        Ok(Self(array))
    }
}

#[derive(Debug, Deserialize)]
struct PoseEntry {
    positions: Vec<f64>,
}

/// Read-only mapping from every [`EmotionTag`] to its resting pose.
#[derive(Debug, Clone)]
pub struct PoseStore {
    // Indexed by the tag discriminant; complete by construction.
    poses: [PoseVector; EmotionTag::COUNT],
}

impl PoseStore {
    /// Load the pose file. Every emotion must be present with exactly
    /// [`POSE_LEN`] positions.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PoseStoreError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| PoseStoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let store = Self::from_yaml_str(&text)?;
        log::info!("🎭 Loaded {} emotion poses from {}", store.len(), path.display());
        Ok(store)
    }

    /// Parse `emotion: { positions: [...] }` entries. Unknown emotions are
    /// ignored with a warning.
    pub fn from_yaml_str(text: &str) -> Result<Self, PoseStoreError> {
        let entries: HashMap<String, PoseEntry> = serde_yaml::from_str(text)?;

        for name in entries.keys() {
            if name.parse::<EmotionTag>().is_err() {
                log::warn!("⚠️ Ignoring pose for unknown emotion '{}'", name);
            }
        }

        let mut poses = [PoseVector::new([0.0; POSE_LEN]); EmotionTag::COUNT];
        for tag in EmotionTag::iter() {
            let entry = entries
                .get(tag.as_ref())
                .ok_or_else(|| PoseStoreError::MissingEmotion(tag.to_string()))?;
            poses[tag as usize] = PoseVector::try_from(entry.positions.clone()).map_err(|len| {
                PoseStoreError::WrongLength {
                    emotion: tag.to_string(),
                    len,
                    expected: POSE_LEN,
                }
            })?;
        }

        Ok(Self { poses })
    }

    /// Build a store from an explicit table, e.g. for simulation.
    pub fn from_fn(mut pose_for: impl FnMut(EmotionTag) -> PoseVector) -> Self {
        let mut poses = [PoseVector::new([0.0; POSE_LEN]); EmotionTag::COUNT];
        for tag in EmotionTag::iter() {
            poses[tag as usize] = pose_for(tag);
        }
        Self { poses }
    }

    pub fn get(&self, emotion: EmotionTag) -> Option<&PoseVector> {
        self.poses.get(emotion as usize)
    }

    pub fn contains(&self, emotion: EmotionTag) -> bool {
        self.get(emotion).is_some()
    }

    /// Resting pose for `emotion`. Total over the enumeration.
    pub fn pose(&self, emotion: EmotionTag) -> PoseVector {
        self.poses[emotion as usize]
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }
}

/// Which task produced a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameSource {
    Resting,
    Animation,
}

/// A joint-state message: names, positions and the time it was produced.
#[derive(Debug, Clone, Serialize)]
pub struct PoseFrame {
    pub stamp: DateTime<Utc>,
    pub name: [&'static str; POSE_LEN],
    pub position: PoseVector,
    pub source: FrameSource,
}

impl PoseFrame {
    pub fn new(position: PoseVector, source: FrameSource) -> Self {
        Self {
            stamp: Utc::now(),
            name: JOINT_NAMES,
            position,
            source,
        }
    }
}
