//! In-memory profile directory.

use super::types::Profile;

/// What an [`ProfileDirectory::upsert`] changed, so it can be reverted.
#[derive(Debug, Clone, PartialEq)]
pub enum Upserted {
    /// A record at `index` was replaced; holds the previous value.
    Replaced { index: usize, previous: Profile },
    /// A new record was appended at `index`.
    Appended { index: usize },
}

/// Ordered collection of profiles keyed by id.
#[derive(Debug, Clone, Default)]
pub struct ProfileDirectory {
    profiles: Vec<Profile>,
}

impl ProfileDirectory {
    pub fn new(profiles: Vec<Profile>) -> Self {
        let mut dir = Self::default();
        for profile in profiles {
            dir.upsert(profile);
        }
        dir
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Look up a profile. Absence is not an error.
    pub fn get_by_id(&self, id: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    /// Replace the record with the same id in place, or append.
    pub fn upsert(&mut self, profile: Profile) -> Upserted {
        match self.profiles.iter().position(|p| p.id == profile.id) {
            Some(index) => {
                let previous = std::mem::replace(&mut self.profiles[index], profile);
                tracing::debug!("Replaced profile {} at {}", previous.id, index);
                Upserted::Replaced { index, previous }
            }
            None => {
                tracing::debug!("Appended profile {}", profile.id);
                self.profiles.push(profile);
                Upserted::Appended {
                    index: self.profiles.len() - 1,
                }
            }
        }
    }

    /// Undo a previous upsert. Must be applied before any other mutation.
    pub fn restore(&mut self, change: Upserted) {
        match change {
            Upserted::Replaced { index, previous } => {
                if let Some(slot) = self.profiles.get_mut(index) {
                    *slot = previous;
                }
            }
            Upserted::Appended { index } => {
                if index < self.profiles.len() {
                    self.profiles.remove(index);
                }
            }
        }
    }

    /// The first `n` profiles, as featured on the home view.
    pub fn recent(&self, n: usize) -> &[Profile] {
        &self.profiles[..n.min(self.profiles.len())]
    }
}
