/// Gallery artifact model and the built-in sample collection
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A completed gallery entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoArtifact {
    /// Unique identifier, assigned at creation, immutable
    pub id: String,

    /// Short human-readable title
    pub title: String,

    /// The prompt that produced (or will reproduce) this video
    pub description: String,

    /// Video data reference: an inline `data:video/mp4;base64,` encoding
    /// or a remote URI
    #[serde(rename = "videoUrl")]
    pub payload: String,
}

impl VideoArtifact {
    /// Create a new artifact with a fresh id
    pub fn new(title: String, description: String, payload: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            description,
            payload,
        }
    }
}

/// Entries shown before the first daily batch has run, and after
/// recovery from unreadable stored data
pub fn seed_collection() -> Vec<VideoArtifact> {
    vec![
        VideoArtifact {
            id: "sample-ember-ridge".to_string(),
            title: "Ember Ridge at Dusk".to_string(),
            description: "A cinematic aerial shot sweeping low over a pine ridge at dusk, \
                          embers drifting through golden light."
                .to_string(),
            payload: "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ForBiggerBlazes.mp4".to_string(),
        },
        VideoArtifact {
            id: "sample-tide-glass".to_string(),
            title: "Tide in Slow Glass".to_string(),
            description: "An ultra slow motion macro shot of a turquoise wave curling over, \
                          sunlight refracting through the crest."
                .to_string(),
            payload: "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ForBiggerEscapes.mp4".to_string(),
        },
        VideoArtifact {
            id: "sample-neon-rain".to_string(),
            title: "Neon Rain Crossing".to_string(),
            description: "A photorealistic street-level shot of a rainy neon-lit crossing at \
                          night, umbrellas blooming in reflected color."
                .to_string(),
            payload: "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ForBiggerJoyrides.mp4".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_assigns_unique_ids() {
        let a = VideoArtifact::new("A".to_string(), "p".to_string(), "u".to_string());
        let b = VideoArtifact::new("B".to_string(), "p".to_string(), "u".to_string());
        assert_ne!(a.id, b.id);
        assert!(!a.id.is_empty());
    }

    #[test]
    fn test_seed_collection_is_well_formed() {
        let seeds = seed_collection();
        assert_eq!(seeds.len(), 3);
        for artifact in &seeds {
            assert!(!artifact.id.is_empty());
            assert!(!artifact.title.is_empty());
            assert!(!artifact.payload.is_empty());
        }
        let mut ids: Vec<_> = seeds.iter().map(|v| v.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), seeds.len());
    }

    #[test]
    fn test_payload_serializes_as_video_url() {
        let artifact = VideoArtifact::new(
            "Title".to_string(),
            "prompt".to_string(),
            "https://example.com/clip.mp4".to_string(),
        );
        let json = serde_json::to_string(&artifact).unwrap();
        assert!(json.contains("\"videoUrl\""));
        assert!(!json.contains("\"payload\""));
    }
}
