//! Filter engine over the profile directory.
//!
//! Everything here is a pure function of its inputs. Callers re-run
//! [`apply_filter`] whenever the profiles or the criteria change.

use std::collections::BTreeSet;

use super::types::{is_set, FilterCriteria, Profile};

/// Profiles satisfying every set criterion, in source order.
pub fn apply_filter<'a>(profiles: &'a [Profile], criteria: &FilterCriteria) -> Vec<&'a Profile> {
    let location = criteria.location.to_lowercase();
    let interest = criteria.hackathon_interests.to_lowercase();
    let term = criteria.search_term.to_lowercase();

    profiles
        .iter()
        .filter(|p| {
            criteria.skills.is_empty() || p.skills.iter().any(|s| criteria.skills.contains(s))
        })
        .filter(|p| !is_set(&criteria.location) || p.location.to_lowercase().contains(&location))
        .filter(|p| {
            !is_set(&criteria.hackathon_interests)
                || p.hackathon_interests
                    .iter()
                    .any(|h| h.to_lowercase().contains(&interest))
        })
        .filter(|p| {
            term.is_empty()
                || p.name.to_lowercase().contains(&term)
                || p.bio.to_lowercase().contains(&term)
        })
        .collect()
}

/// Every distinct skill across the directory, sorted.
pub fn all_skills(profiles: &[Profile]) -> Vec<String> {
    profiles
        .iter()
        .flat_map(|p| p.skills.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Every distinct location, sorted. Case variants stay separate.
pub fn all_locations(profiles: &[Profile]) -> Vec<String> {
    profiles
        .iter()
        .map(|p| p.location.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Display category of a skill badge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkillCategory {
    React,
    Vue,
    Angular,
    Node,
    Python,
    Design,
    Frontend,
    Backend,
    Mobile,
    DevOps,
    Ai,
    Blockchain,
    Other,
}

impl SkillCategory {
    /// Named categories in match priority order.
    const NAMED: [SkillCategory; 12] = [
        SkillCategory::React,
        SkillCategory::Vue,
        SkillCategory::Angular,
        SkillCategory::Node,
        SkillCategory::Python,
        SkillCategory::Design,
        SkillCategory::Frontend,
        SkillCategory::Backend,
        SkillCategory::Mobile,
        SkillCategory::DevOps,
        SkillCategory::Ai,
        SkillCategory::Blockchain,
    ];

    /// Classify a free-text skill.
    pub fn classify(skill: &str) -> Self {
        let skill = skill.to_lowercase();

        if let Some(named) = Self::NAMED.iter().find(|c| skill.contains(c.as_str())) {
            return *named;
        }

        let has = |keys: &[&str]| keys.iter().any(|k| skill.contains(k));
        if has(&["front", "ui", "ux"]) {
            SkillCategory::Frontend
        } else if has(&["back", "server"]) {
            SkillCategory::Backend
        } else if has(&["design", "figma"]) {
            SkillCategory::Design
        } else if has(&["mobile", "app"]) {
            SkillCategory::Mobile
        } else if has(&["devops", "cloud"]) {
            SkillCategory::DevOps
        } else if has(&["ai", "ml"]) {
            SkillCategory::Ai
        } else {
            SkillCategory::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::React => "react",
            SkillCategory::Vue => "vue",
            SkillCategory::Angular => "angular",
            SkillCategory::Node => "node",
            SkillCategory::Python => "python",
            SkillCategory::Design => "design",
            SkillCategory::Frontend => "frontend",
            SkillCategory::Backend => "backend",
            SkillCategory::Mobile => "mobile",
            SkillCategory::DevOps => "devops",
            SkillCategory::Ai => "ai",
            SkillCategory::Blockchain => "blockchain",
            SkillCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
