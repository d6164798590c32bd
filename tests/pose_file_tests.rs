use strum::IntoEnumIterator;
use talking_face::{
    pose::{PoseStore, JAW_INDEX},
    EmotionTag,
};

#[test]
fn test_shipped_pose_file_covers_every_emotion() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/emotions.yaml");
    let store = PoseStore::load(path).expect("Failed to load shipped poses");

    assert_eq!(store.len(), EmotionTag::iter().count());
    for tag in EmotionTag::iter() {
        assert!(store.contains(tag), "missing {}", tag);
    }
}

#[test]
fn test_shipped_poses_are_distinct_with_a_mostly_closed_mouth() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/emotions.yaml");
    let store = PoseStore::load(path).unwrap();

    let poses: Vec<_> = EmotionTag::iter().map(|tag| store.pose(tag)).collect();
    for (i, a) in poses.iter().enumerate() {
        for b in &poses[i + 1..] {
            assert_ne!(a, b);
        }
        assert!(a.positions()[JAW_INDEX].abs() <= 0.2);
    }
}

#[test]
fn test_missing_pose_file_is_reported() {
    let result = PoseStore::load("/nonexistent/emotions.yaml");
    assert!(result.is_err());
}
