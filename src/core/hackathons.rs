//! Hackathon catalog queries.

use chrono::{DateTime, Utc};

use super::types::Hackathon;
use crate::error::Error;

/// Venue restriction for catalog listings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LocationType {
    #[default]
    All,
    Online,
    Onsite,
}

impl std::str::FromStr for LocationType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" | "" => Ok(LocationType::All),
            "online" => Ok(LocationType::Online),
            "onsite" => Ok(LocationType::Onsite),
            other => Err(Error::Validation(format!(
                "Unknown location type '{}', expected all, online or onsite",
                other
            ))),
        }
    }
}

/// Read-only list of hackathons.
#[derive(Debug, Clone, Default)]
pub struct HackathonCatalog {
    hackathons: Vec<Hackathon>,
}

impl HackathonCatalog {
    pub fn new(hackathons: Vec<Hackathon>) -> Self {
        Self { hackathons }
    }

    pub fn hackathons(&self) -> &[Hackathon] {
        &self.hackathons
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Hackathon> {
        self.hackathons.iter().find(|h| h.id == id)
    }

    /// Title for a hackathon id, used as the interest filter value.
    pub fn interest_title(&self, id: &str) -> Option<&str> {
        self.get_by_id(id).map(|h| h.title.as_str())
    }

    /// Search title, description and tags, then restrict by venue.
    pub fn search(&self, term: &str, location_type: LocationType) -> Vec<&Hackathon> {
        let term = term.to_lowercase();
        self.hackathons
            .iter()
            .filter(|h| {
                h.title.to_lowercase().contains(&term)
                    || h.description.to_lowercase().contains(&term)
                    || h.tags.iter().any(|t| t.to_lowercase().contains(&term))
            })
            .filter(|h| match location_type {
                LocationType::All => true,
                LocationType::Online => h.is_online,
                LocationType::Onsite => !h.is_online,
            })
            .collect()
    }

    /// Next `n` hackathons starting after `now`, soonest first.
    pub fn upcoming(&self, now: DateTime<Utc>, n: usize) -> Vec<&Hackathon> {
        let mut upcoming: Vec<&Hackathon> =
            self.hackathons.iter().filter(|h| h.start_date > now).collect();
        upcoming.sort_by_key(|h| h.start_date);
        upcoming.truncate(n);
        upcoming
    }
}

/// Split a listing into (upcoming, past) relative to `now`, keeping order.
pub fn split_by_date<'a>(
    hackathons: &[&'a Hackathon],
    now: DateTime<Utc>,
) -> (Vec<&'a Hackathon>, Vec<&'a Hackathon>) {
    hackathons.iter().copied().partition(|h| h.start_date > now)
}
