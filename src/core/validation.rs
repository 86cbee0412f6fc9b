//! Profile creation: validate a submitted draft and build the record.

use serde::{Deserialize, Serialize};

use super::ids::profile_id;
use super::types::Profile;
use crate::error::{Error, Result};

/// Message shown when required fields are missing.
pub const REQUIRED_FIELDS_MESSAGE: &str =
    "Please fill in all required fields and add at least one skill.";

/// Number of stock avatars to pick from.
const AVATAR_COUNT: u8 = 70;

/// Unvalidated create-profile submission.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDraft {
    pub name: String,
    pub bio: String,
    pub location: String,
    pub email: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub hackathon_interests: Vec<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
}

impl ProfileDraft {
    /// Check required fields. Nothing is written on failure.
    pub fn validate(&self) -> Result<()> {
        let blank = [&self.name, &self.bio, &self.location, &self.email]
            .iter()
            .any(|f| f.trim().is_empty());
        if blank || normalize_skills(&self.skills).is_empty() {
            return Err(Error::Validation(REQUIRED_FIELDS_MESSAGE.to_string()));
        }
        Ok(())
    }

    /// Validate and turn the draft into a profile with a fresh id.
    pub fn into_profile(self) -> Result<Profile> {
        self.validate()?;
        let id = profile_id();

        let mut interests: Vec<String> = Vec::new();
        for title in self.hackathon_interests {
            if !interests.contains(&title) {
                interests.push(title);
            }
        }

        Ok(Profile {
            avatar: avatar_for(&id),
            name: self.name.trim().to_string(),
            bio: self.bio.trim().to_string(),
            skills: normalize_skills(&self.skills),
            location: self.location.trim().to_string(),
            hackathon_interests: interests,
            email: self.email.trim().to_string(),
            github: non_blank(self.github),
            linkedin: non_blank(self.linkedin),
            id,
        })
    }
}

/// Trim skills, drop blanks and repeats, keep first-seen order.
pub fn normalize_skills(skills: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(skills.len());
    for skill in skills.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        if !out.iter().any(|s| s == skill) {
            out.push(skill.to_string());
        }
    }
    out
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Stock avatar URI, stable for a given id.
fn avatar_for(id: &str) -> String {
    let n = id.bytes().fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));
    format!("https://i.pravatar.cc/150?img={}", n % AVATAR_COUNT as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ProfileDraft {
        ProfileDraft {
            name: "Ada".to_string(),
            bio: "Compilers and coffee".to_string(),
            location: "London, UK".to_string(),
            email: "ada@example.com".to_string(),
            skills: vec!["Rust".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_draft_builds_profile() {
        let mut d = draft();
        d.skills = vec![" Rust ".to_string(), "Go".to_string(), "Rust".to_string(), "  ".to_string()];
        d.github = Some("".to_string());
        d.linkedin = Some("ada-l".to_string());

        let profile = d.into_profile().unwrap();
        assert!(profile.id.starts_with("user-"));
        assert!(profile.avatar.starts_with("https://i.pravatar.cc/150?img="));
        assert_eq!(profile.skills, vec!["Rust", "Go"]);
        assert_eq!(profile.github, None);
        assert_eq!(profile.linkedin.as_deref(), Some("ada-l"));
    }

    #[test]
    fn test_missing_fields_rejected() {
        let mut d = draft();
        d.email = "   ".to_string();
        let err = d.validate().unwrap_err();
        assert_eq!(err.to_string(), REQUIRED_FIELDS_MESSAGE);

        let mut d = draft();
        d.skills.clear();
        assert!(d.into_profile().is_err());
    }

    #[test]
    fn test_avatar_is_stable() {
        assert_eq!(avatar_for("user-1"), avatar_for("user-1"));
    }
}
