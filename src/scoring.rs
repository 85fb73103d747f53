use crate::directory::TARGET_ROLES;

pub const BASE_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 5.0;

const ROLE_STEP: f64 = 0.5;
const ROLE_CAP: f64 = 2.0;

const SENIORITY_MARKERS: [&str; 4] = ["strateg", "lead", "head", "päällikkö"];
const AI_TITLE_MARKERS: [&str; 3] = ["ai ", "genai", "technolog"];
const AI_DESCRIPTION_MARKERS: [&str; 4] = ["ai ", "artificial intelligence", "chatgpt", "midjourney"];
const HOME_LOCATIONS: [&str; 2] = ["helsinki", "espoo"];

/// Keyword match score in `[1.0, 5.0]` against the built-in target roles.
pub fn match_score(title: &str, location: &str, description: &str) -> f64 {
    match_score_with(TARGET_ROLES, title, location, description)
}

/// Same heuristic against a caller-supplied role list.
pub fn match_score_with<S: AsRef<str>>(
    roles: &[S],
    title: &str,
    location: &str,
    description: &str,
) -> f64 {
    let title = title.to_lowercase();
    let location = location.to_lowercase();
    let description = description.to_lowercase();

    let mut score = BASE_SCORE;

    let role_hits = roles
        .iter()
        .filter(|role| title.contains(&role.as_ref().to_lowercase()))
        .count();
    score += (role_hits as f64 * ROLE_STEP).min(ROLE_CAP);

    if contains_any(&title, &SENIORITY_MARKERS) {
        score += 1.0;
    }

    if contains_any(&title, &AI_TITLE_MARKERS) || contains_any(&description, &AI_DESCRIPTION_MARKERS) {
        score += 1.0;
    }

    if contains_any(&location, &HOME_LOCATIONS) {
        score += 1.0;
    } else if location.contains("remote") {
        score += 0.8;
    }

    score.min(MAX_SCORE)
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Strong,
    Moderate,
    Weak,
}

impl MatchTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 4.0 {
            MatchTier::Strong
        } else if score >= 2.5 {
            MatchTier::Moderate
        } else {
            MatchTier::Weak
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchTier::Strong => "strong match",
            MatchTier::Moderate => "moderate match",
            MatchTier::Weak => "weak match",
        }
    }

    pub fn verdict(self) -> &'static str {
        match self {
            MatchTier::Strong => "The role lines up well with the target roles and keywords.",
            MatchTier::Moderate => "The role has the right elements but deserves a closer look.",
            MatchTier::Weak => "The role does not appear to match the core focus areas.",
        }
    }
}

/// Text rendition of the score as a fill bar, e.g. `[#######-------]`.
pub fn progress_bar(score: f64, width: usize) -> String {
    let ratio = (score / MAX_SCORE).clamp(0.0, 1.0);
    let filled = (ratio * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TITLES: [&str; 8] = [
        "",
        "Projektipäällikkö",
        "Senior Content Manager",
        "Head of GenAI Strategy",
        "Content Manager / Creative Producer / UI/UX-suunnittelija / Art Director Assistant / Graafinen suunnittelija",
        "Lead AI technologist, Creative Producer, Content Manager",
        "Warehouse worker",
        "Strategist",
    ];
    const LOCATIONS: [&str; 5] = ["", "Helsinki", "Espoo, Finland", "Remote (EU)", "Oulu"];
    const DESCRIPTIONS: [&str; 3] = ["", "We use ChatGPT and Midjourney daily", "No tooling mentioned"];

    #[test]
    fn test_score_always_within_bounds() {
        for title in TITLES {
            for location in LOCATIONS {
                for description in DESCRIPTIONS {
                    let score = match_score(title, location, description);
                    assert!(
                        (BASE_SCORE..=MAX_SCORE).contains(&score),
                        "{score} out of range for {title:?}/{location:?}/{description:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_maximal_title_is_clamped() {
        let score = match_score(TITLES[5], "Helsinki", "artificial intelligence");
        assert_eq!(score, MAX_SCORE);
    }

    #[test]
    fn test_location_bonus() {
        let helsinki = match_score("Projektipäällikkö", "Helsinki", "");
        let oulu = match_score("Projektipäällikkö", "Oulu", "");
        let remote = match_score("Projektipäällikkö", "Remote", "");
        assert!(helsinki >= oulu);
        assert!((helsinki - oulu - 1.0).abs() < 1e-9);
        assert!((remote - oulu - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_case_insensitive() {
        for title in TITLES {
            for location in LOCATIONS {
                for description in DESCRIPTIONS {
                    let base = match_score(title, location, description);
                    let upper = match_score(
                        &title.to_uppercase(),
                        &location.to_uppercase(),
                        &description.to_uppercase(),
                    );
                    let lower = match_score(
                        &title.to_lowercase(),
                        &location.to_lowercase(),
                        &description.to_lowercase(),
                    );
                    assert_eq!(base, upper, "{title:?}");
                    assert_eq!(base, lower, "{title:?}");
                }
            }
        }
    }

    #[test]
    fn test_more_roles_never_score_lower() {
        let one = match_score("Content Manager", "Oulu", "");
        let two = match_score("Content Manager and Creative Producer", "Oulu", "");
        assert!(two >= one);
        assert!((one - 1.5).abs() < 1e-9);
        assert!((two - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_role_bonus_capped_at_two() {
        let score = match_score(TITLES[4], "", "");
        assert!((score - 3.0).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn test_ai_bonus_from_title_or_description() {
        let plain = match_score("Designer", "", "");
        let from_title = match_score("GenAI designer", "", "");
        let from_desc = match_score("Designer", "", "Experience with ChatGPT");
        let both = match_score("GenAI designer", "", "Experience with ChatGPT");
        assert_eq!(plain, 1.0);
        assert_eq!(from_title, 2.0);
        assert_eq!(from_desc, 2.0);
        assert_eq!(both, 2.0);
    }

    #[test]
    fn test_custom_roles() {
        let roles = vec!["motion designer".to_string()];
        assert_eq!(match_score_with(roles.as_slice(), "Motion Designer", "", ""), 1.5);
        assert_eq!(match_score_with(roles.as_slice(), "Content Manager", "", ""), 1.0);
    }

    #[test]
    fn test_tiers() {
        assert_eq!(MatchTier::from_score(4.0), MatchTier::Strong);
        assert_eq!(MatchTier::from_score(3.99), MatchTier::Moderate);
        assert_eq!(MatchTier::from_score(2.5), MatchTier::Moderate);
        assert_eq!(MatchTier::from_score(2.49), MatchTier::Weak);
        assert_eq!(MatchTier::from_score(1.0).label(), "weak match");
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(5.0, 10), "[##########]");
        assert_eq!(progress_bar(2.5, 10), "[#####-----]");
        assert_eq!(progress_bar(0.0, 4), "[----]");
    }
}
