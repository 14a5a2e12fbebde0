use std::collections::HashSet;

use crate::models::{
    AdvisoryCategory::{Frightening, Nudity, Profanity, Violence},
    AdvisoryLevel::{Mild, Moderate, Severe},
    ContentAdvisory, Genre,
};

const ADULT_CERTIFICATIONS: &[&str] = &["R", "18", "NC-17", "A", "TV-MA", "X"];
const TEEN_CERTIFICATIONS: &[&str] = &["PG-13", "12A", "12", "15", "TV-14", "UA"];
const CHILDREN_CERTIFICATIONS: &[&str] = &["G", "U", "TV-Y", "TV-G", "PG"];

/// Infers a parental guide from an age certification and genre names
///
/// Certification sets a floor for profanity and violence; genre rules only
/// ever raise a category. Family or animation titles with a children's
/// certification are reset to all-clear at the end. Unknown certifications
/// and genres match no rule.
pub fn classify(certification: Option<&str>, genres: &[Genre]) -> ContentAdvisory {
    let certification = certification.map(|c| c.trim().to_uppercase());
    let certification = certification.as_deref();
    let genres: HashSet<String> = genres.iter().map(|g| g.name.to_lowercase()).collect();
    let has = |name: &str| genres.contains(name);

    let is_adult = certification.is_some_and(|c| ADULT_CERTIFICATIONS.contains(&c));
    let is_teen = certification.is_some_and(|c| TEEN_CERTIFICATIONS.contains(&c));
    let graphic = if is_adult { Severe } else { Moderate };

    let mut advisory = ContentAdvisory::default();

    if is_adult {
        advisory.raise(Profanity, Moderate);
        advisory.raise(Violence, Moderate);
    } else if is_teen {
        advisory.raise(Profanity, Mild);
        advisory.raise(Violence, Mild);
    }

    if has("horror") {
        advisory.raise(Frightening, Severe);
        advisory.raise(Violence, graphic);
    } else if has("thriller") {
        advisory.raise(Frightening, Moderate);
        advisory.raise(Violence, Mild);
    }

    if has("action") || has("war") {
        advisory.raise(Violence, graphic);
    }

    if has("crime") {
        advisory.raise(Violence, Mild);
        advisory.raise(Profanity, Mild);
    }

    if has("romance") {
        advisory.raise(Nudity, if is_adult { Moderate } else { Mild });
    }

    if has("comedy") && !has("family") {
        advisory.raise(Profanity, Mild);
    }

    let is_for_children = certification.is_some_and(|c| CHILDREN_CERTIFICATIONS.contains(&c));
    if (has("family") || has("animation")) && is_for_children {
        advisory.clear();
    }

    advisory.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AdvisoryCategory, AdvisoryLevel};

    fn genres(names: &[&str]) -> Vec<Genre> {
        names.iter().map(|n| Genre::named(*n)).collect()
    }

    fn assert_all_clear(advisory: &ContentAdvisory) {
        for category in AdvisoryCategory::ALL {
            assert_eq!(advisory.level(category), AdvisoryLevel::None, "{:?}", category);
        }
        assert!(advisory.is_family_friendly);
    }

    #[test]
    fn test_g_rated_animation_is_family_friendly() {
        let advisory = classify(Some("G"), &genres(&["Animation"]));
        assert_all_clear(&advisory);
    }

    #[test]
    fn test_r_rated_horror() {
        let advisory = classify(Some("R"), &genres(&["Horror"]));
        assert_eq!(advisory.violence, AdvisoryLevel::Severe);
        assert_eq!(advisory.frightening, AdvisoryLevel::Severe);
        assert_eq!(advisory.profanity, AdvisoryLevel::Moderate);
        assert_eq!(advisory.nudity, AdvisoryLevel::None);
        assert!(!advisory.is_family_friendly);
    }

    #[test]
    fn test_pg13_action() {
        let advisory = classify(Some("PG-13"), &genres(&["Action"]));
        assert_eq!(advisory.violence, AdvisoryLevel::Moderate);
        assert_eq!(advisory.profanity, AdvisoryLevel::Mild);
        assert_eq!(advisory.nudity, AdvisoryLevel::None);
        assert_eq!(advisory.frightening, AdvisoryLevel::None);
        assert!(!advisory.is_family_friendly);
    }

    #[test]
    fn test_no_certification_no_genres() {
        let advisory = classify(None, &[]);
        assert_all_clear(&advisory);
    }

    #[test]
    fn test_pg_family_comedy_override() {
        let advisory = classify(Some("PG"), &genres(&["Comedy", "Family"]));
        assert_all_clear(&advisory);
    }

    #[test]
    fn test_certification_and_genres_are_case_insensitive() {
        let advisory = classify(Some(" tv-ma "), &genres(&["HORROR"]));
        assert_eq!(advisory.violence, AdvisoryLevel::Severe);
        assert_eq!(advisory.profanity, AdvisoryLevel::Moderate);
    }

    #[test]
    fn test_thriller_skipped_when_horror_present() {
        let advisory = classify(None, &genres(&["Horror", "Thriller"]));
        assert_eq!(advisory.frightening, AdvisoryLevel::Severe);
        assert_eq!(advisory.violence, AdvisoryLevel::Moderate);
    }

    #[test]
    fn test_thriller_alone() {
        let advisory = classify(None, &genres(&["Thriller"]));
        assert_eq!(advisory.frightening, AdvisoryLevel::Moderate);
        assert_eq!(advisory.violence, AdvisoryLevel::Mild);
    }

    #[test]
    fn test_genre_rules_never_lower_certification_floor() {
        let advisory = classify(Some("R"), &genres(&["Crime", "Thriller", "Comedy"]));
        assert_eq!(advisory.profanity, AdvisoryLevel::Moderate);
        assert_eq!(advisory.violence, AdvisoryLevel::Moderate);
        assert_eq!(advisory.frightening, AdvisoryLevel::Moderate);
    }

    #[test]
    fn test_romance_nudity_depends_on_certification() {
        assert_eq!(
            classify(Some("R"), &genres(&["Romance"])).nudity,
            AdvisoryLevel::Moderate
        );
        assert_eq!(
            classify(Some("PG-13"), &genres(&["Romance"])).nudity,
            AdvisoryLevel::Mild
        );
    }

    #[test]
    fn test_war_under_adult_certification_is_severe() {
        let advisory = classify(Some("18"), &genres(&["War"]));
        assert_eq!(advisory.violence, AdvisoryLevel::Severe);
    }

    #[test]
    fn test_family_genre_without_children_certification_keeps_ratings() {
        let advisory = classify(Some("PG-13"), &genres(&["Family", "Action"]));
        assert_eq!(advisory.violence, AdvisoryLevel::Moderate);
        assert!(!advisory.is_family_friendly);
    }

    #[test]
    fn test_family_comedy_without_certification_skips_comedy_rule() {
        let advisory = classify(None, &genres(&["Comedy", "Family"]));
        assert_all_clear(&advisory);
    }

    #[test]
    fn test_unknown_certification_is_ignored() {
        let advisory = classify(Some("NR"), &genres(&["Documentary"]));
        assert_all_clear(&advisory);
    }
}
