use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use strum::{AsRefStr, Display, EnumCount, EnumIter, EnumString, FromRepr, IntoEnumIterator};

/// Closed set of facial expressions the face can hold.
///
/// Declaration order is the extraction priority: when a reply carries more
/// than one marker, the tag declared first wins regardless of where it sits
/// in the text.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    AsRefStr,
    EnumCount,
    EnumIter,
    EnumString,
    FromRepr,
)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum EmotionTag {
    Happy,
    Sad,
    Angry,
    Surprised,
    Suspicious,
    Sleepy,
    Neutral,
}

impl EmotionTag {
    /// Tag used when a reply carries no recognised marker.
    pub const FALLBACK: EmotionTag = EmotionTag::Neutral;

    /// Tags in extraction priority order.
    pub fn by_priority() -> impl Iterator<Item = EmotionTag> {
        EmotionTag::iter()
    }

    /// The literal marker the reply engine is asked to emit, e.g. `[happy]`.
    pub fn marker(self) -> String {
        format!("[{}]", self.as_ref())
    }
}

impl Default for EmotionTag {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// Lock-free cell holding the emotion currently shown by the face.
///
/// One writer (the conversation loop), any number of readers (pose publisher,
/// jaw animator). The tag is stored as its discriminant so a read can never
/// observe a half-written value.
#[derive(Debug)]
pub struct EmotionCell(AtomicU8);

impl EmotionCell {
    pub fn new(initial: EmotionTag) -> Self {
        Self(AtomicU8::new(initial as u8))
    }

    pub fn get(&self) -> EmotionTag {
        // Only valid discriminants are ever stored.
        EmotionTag::from_repr(self.0.load(Ordering::Acquire)).unwrap_or_default()
    }

    pub fn set(&self, emotion: EmotionTag) {
        self.0.store(emotion as u8, Ordering::Release);
    }
}

impl Default for EmotionCell {
    fn default() -> Self {
        Self::new(EmotionTag::FALLBACK)
    }
}

/// State shared between the conversation loop and the pose tasks.
#[derive(Debug, Default)]
pub struct FaceState {
    emotion: EmotionCell,
    animating: AtomicBool,
}

impl FaceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emotion(&self) -> EmotionTag {
        self.emotion.get()
    }

    pub fn set_emotion(&self, emotion: EmotionTag) {
        let previous = self.emotion.get();
        self.emotion.set(emotion);
        if previous != emotion {
            log::info!("🎭 Emotion: {} → {}", previous, emotion);
        }
    }

    /// True while a jaw animation owns the pose stream.
    pub fn is_animating(&self) -> bool {
        self.animating.load(Ordering::Acquire)
    }

    pub(crate) fn set_animating(&self, active: bool) {
        self.animating.store(active, Ordering::Release);
    }
}
