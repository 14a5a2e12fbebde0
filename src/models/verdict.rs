use serde::{Deserialize, Serialize};

/// Where a title is best watched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Theater,
    Stream,
}

/// "Theater or stream" rating derived from critic reviews
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewingVerdict {
    pub recommendation: Recommendation,
    /// 0-100
    pub confidence: u8,
    /// 1-10
    pub spectacle: u8,
    /// 1-10
    pub sound: u8,
    /// 1-10
    pub story: u8,
    pub summary: String,
    /// Set when the verdict is the static fallback rather than a model rating
    #[serde(default)]
    pub is_fallback: bool,
}

impl ViewingVerdict {
    /// Static verdict served when reviews or the model are unavailable
    pub fn fallback() -> Self {
        Self {
            recommendation: Recommendation::Stream,
            confidence: 50,
            spectacle: 5,
            sound: 5,
            story: 5,
            summary: "Not enough review data to judge the big-screen experience; \
                      streaming at home is the safe bet."
                .to_string(),
            is_fallback: true,
        }
    }
}
