//! CLI commands for HackMatch using clap.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::load_settings_or_default;
use crate::core::{
    split_by_date, FilterCriteria, Hackathon, LocationType, Message, Profile, ProfileDraft,
    SkillCategory,
};
use crate::session::Session;

/// HackMatch - find teammates for your next hackathon.
#[derive(Parser)]
#[command(name = "hackmatch")]
#[command(version = "0.1.0")]
#[command(about = "HackMatch - find teammates for your next hackathon", long_about = None)]
pub struct Commands {
    /// Act as this profile id
    #[arg(long, global = true, env = "HACKMATCH_USER")]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Browse the directory
    Profiles {
        /// Required skill (repeat for any-of)
        #[arg(long = "skill")]
        skills: Vec<String>,

        /// Location substring
        #[arg(long)]
        location: Option<String>,

        /// Hackathon title substring
        #[arg(long)]
        hackathon: Option<String>,

        /// Search name and bio
        #[arg(long)]
        search: Option<String>,
    },

    /// Show one profile
    Profile {
        /// Profile id
        id: String,
    },

    /// Create a profile
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        bio: String,

        #[arg(long)]
        location: String,

        #[arg(long)]
        email: String,

        /// Skill (repeatable)
        #[arg(long = "skill")]
        skills: Vec<String>,

        /// Hackathon title you are interested in (repeatable)
        #[arg(long = "hackathon")]
        hackathons: Vec<String>,

        #[arg(long)]
        github: Option<String>,

        #[arg(long)]
        linkedin: Option<String>,
    },

    /// List every skill in the directory
    Skills,

    /// List every location in the directory
    Locations,

    /// Browse hackathons
    Hackathons {
        /// Search title, description and tags
        #[arg(long, default_value = "")]
        search: String,

        /// all, online or onsite
        #[arg(long = "type", default_value = "all")]
        location_type: String,
    },

    /// Send a message
    Send {
        /// Recipient profile id
        to: String,

        /// Message to send
        message: String,
    },

    /// Show the thread with a profile
    Thread {
        /// Other profile id
        with: String,
    },

    /// List conversations, most recent first
    Inbox,

    /// Show the current profile
    Whoami,

    /// Featured profiles and the next hackathons
    Home,
}

impl Commands {
    pub async fn run(&self) -> Result<()> {
        let mut settings = load_settings_or_default();
        if let Some(user) = &self.user {
            settings.current_user_id = user.clone();
        }
        let mut session = Session::from_settings(&settings).await?;

        match &self.command {
            Command::Profiles { skills, location, hackathon, search } => {
                let criteria = FilterCriteria {
                    skills: skills.clone(),
                    location: location.clone().unwrap_or_default(),
                    hackathon_interests: hackathon.clone().unwrap_or_default(),
                    search_term: search.clone().unwrap_or_default(),
                };
                cmd_profiles(&mut session, criteria)
            }
            Command::Profile { id } => cmd_profile(&session, id),
            Command::Create {
                name,
                bio,
                location,
                email,
                skills,
                hackathons,
                github,
                linkedin,
            } => {
                let draft = ProfileDraft {
                    name: name.clone(),
                    bio: bio.clone(),
                    location: location.clone(),
                    email: email.clone(),
                    skills: skills.clone(),
                    hackathon_interests: hackathons.clone(),
                    github: github.clone(),
                    linkedin: linkedin.clone(),
                };
                cmd_create(&mut session, draft).await
            }
            Command::Skills => {
                for skill in session.all_skills() {
                    println!("{} [{}]", skill, SkillCategory::classify(&skill));
                }
                Ok(())
            }
            Command::Locations => {
                for location in session.all_locations() {
                    println!("{}", location);
                }
                Ok(())
            }
            Command::Hackathons { search, location_type } => {
                cmd_hackathons(&session, search, location_type)
            }
            Command::Send { to, message } => cmd_send(&mut session, to, message),
            Command::Thread { with } => cmd_thread(&session, with),
            Command::Inbox => cmd_inbox(&session),
            Command::Home => cmd_home(&session),
            Command::Whoami => {
                match session.current_user() {
                    Some(profile) => print_profile(profile),
                    None => println!("Profile {} not found", session.current_user_id()),
                }
                Ok(())
            }
        }
    }
}

fn cmd_profiles(session: &mut Session, criteria: FilterCriteria) -> Result<()> {
    session.set_criteria(criteria);
    let profiles = session.filtered_profiles();

    println!("Profiles ({} of {}):", profiles.len(), session.directory().len());
    for p in profiles {
        println!("  {:>4}  {:<20} {:<22} {}", p.id, p.name, p.location, p.skills.join(", "));
    }
    Ok(())
}

fn cmd_home(session: &Session) -> Result<()> {
    println!("Recent profiles:");
    for p in session.directory().recent(3) {
        println!("  {:>4}  {:<20} {}", p.id, p.name, p.location);
    }
    println!("Next hackathons:");
    for h in session.hackathons().upcoming(chrono::Utc::now(), 3) {
        print_hackathon(h);
    }
    Ok(())
}

fn cmd_profile(session: &Session, id: &str) -> Result<()> {
    match session.profile(id) {
        Some(profile) => print_profile(profile),
        None => println!("Profile not found: {}", id),
    }
    Ok(())
}

fn print_profile(p: &Profile) {
    println!("{} ({})", p.name, p.id);
    println!("  Location: {}", p.location);
    println!("  Email:    {}", p.email);
    if let Some(github) = &p.github {
        println!("  GitHub:   {}", github);
    }
    if let Some(linkedin) = &p.linkedin {
        println!("  LinkedIn: {}", linkedin);
    }
    println!("  Bio:      {}", p.bio);
    println!("  Skills:");
    for skill in &p.skills {
        println!("    - {} [{}]", skill, SkillCategory::classify(skill));
    }
    if !p.hackathon_interests.is_empty() {
        println!("  Interested in: {}", p.hackathon_interests.join(", "));
    }
}

async fn cmd_create(session: &mut Session, draft: ProfileDraft) -> Result<()> {
    let profile = session.create_profile(draft).await?;
    println!("Profile created: {}", profile.id);
    println!("Use --user {} to act as this profile", profile.id);
    Ok(())
}

fn cmd_hackathons(session: &Session, search: &str, location_type: &str) -> Result<()> {
    let location_type: LocationType = location_type.parse()?;
    let found = session.hackathons().search(search, location_type);
    let (upcoming, past) = split_by_date(&found, chrono::Utc::now());

    println!("Upcoming ({}):", upcoming.len());
    for h in upcoming {
        print_hackathon(h);
    }
    println!("Past ({}):", past.len());
    for h in past {
        print_hackathon(h);
    }
    Ok(())
}

fn print_hackathon(h: &Hackathon) {
    let venue = if h.is_online { "online" } else { h.location.as_str() };
    println!(
        "  {:>3}  {:<30} {} - {}  {}",
        h.id,
        h.title,
        h.start_date.format("%Y-%m-%d"),
        h.end_date.format("%Y-%m-%d"),
        venue
    );
    if !h.tags.is_empty() {
        println!("       tags: {}", h.tags.join(", "));
    }
}

fn cmd_send(session: &mut Session, to: &str, message: &str) -> Result<()> {
    match session.send_message(to, message)? {
        Some(sent) => println!("Sent {} to {}", sent.id, to),
        None => println!("Nothing to send"),
    }
    Ok(())
}

fn cmd_thread(session: &Session, with: &str) -> Result<()> {
    let name = session
        .profile(with)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| with.to_string());
    let messages = session.conversation_with(with);
    if messages.is_empty() {
        println!("No messages with {} yet", name);
        return Ok(());
    }

    println!("Conversation with {}:", name);
    for m in messages {
        print_message(session, m);
    }
    Ok(())
}

fn print_message(session: &Session, m: &Message) {
    let sender = if m.from == session.current_user_id() {
        "you".to_string()
    } else {
        session
            .profile(&m.from)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| m.from.clone())
    };
    println!("  [{}] {}: {}", m.timestamp.format("%Y-%m-%d %H:%M"), sender, m.content);
}

fn cmd_inbox(session: &Session) -> Result<()> {
    let inbox = session.inbox();
    if inbox.is_empty() {
        println!("No conversations yet. Find teammates with 'hackmatch profiles'.");
        return Ok(());
    }

    for summary in inbox {
        // Conversations with profiles no longer in the directory are hidden.
        let Some(profile) = session.profile(&summary.counterpart_id) else {
            continue;
        };
        println!(
            "  {:<20} {}  {}",
            profile.name,
            summary.last_message_time.format("%b %d %H:%M"),
            summary.last_message.content.chars().take(50).collect::<String>()
        );
    }
    Ok(())
}
