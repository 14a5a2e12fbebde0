use serde::{Deserialize, Serialize};

/// Severity of one parental-guide category, ordered from `None` to `Severe`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisoryLevel {
    #[default]
    None,
    Mild,
    Moderate,
    Severe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisoryCategory {
    Violence,
    Nudity,
    Profanity,
    Frightening,
}

impl AdvisoryCategory {
    pub const ALL: [AdvisoryCategory; 4] = [
        AdvisoryCategory::Violence,
        AdvisoryCategory::Nudity,
        AdvisoryCategory::Profanity,
        AdvisoryCategory::Frightening,
    ];
}

/// Genre as returned by TMDB (`{"id": 27, "name": "Horror"}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
}

impl Genre {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

/// Parental guide for a title
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentAdvisory {
    pub violence: AdvisoryLevel,
    pub nudity: AdvisoryLevel,
    pub profanity: AdvisoryLevel,
    pub frightening: AdvisoryLevel,
    /// True iff every category is `None`
    pub is_family_friendly: bool,
}

impl ContentAdvisory {
    pub fn level(&self, category: AdvisoryCategory) -> AdvisoryLevel {
        match category {
            AdvisoryCategory::Violence => self.violence,
            AdvisoryCategory::Nudity => self.nudity,
            AdvisoryCategory::Profanity => self.profanity,
            AdvisoryCategory::Frightening => self.frightening,
        }
    }

    fn slot(&mut self, category: AdvisoryCategory) -> &mut AdvisoryLevel {
        match category {
            AdvisoryCategory::Violence => &mut self.violence,
            AdvisoryCategory::Nudity => &mut self.nudity,
            AdvisoryCategory::Profanity => &mut self.profanity,
            AdvisoryCategory::Frightening => &mut self.frightening,
        }
    }

    /// Raises a category to `level`; never lowers it
    pub fn raise(&mut self, category: AdvisoryCategory, level: AdvisoryLevel) {
        let slot = self.slot(category);
        *slot = (*slot).max(level);
    }

    /// Resets every category to `None`
    pub fn clear(&mut self) {
        for category in AdvisoryCategory::ALL {
            *self.slot(category) = AdvisoryLevel::None;
        }
    }

    /// Recomputes `is_family_friendly` from the four categories
    pub fn finalize(mut self) -> Self {
        self.is_family_friendly = AdvisoryCategory::ALL
            .iter()
            .all(|c| self.level(*c) == AdvisoryLevel::None);
        self
    }
}
