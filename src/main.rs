mod agent;
mod assistant;
mod config;
mod directory;
mod liveness;
mod models;
mod scoring;
mod store;
mod tui;
mod visitors;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use agent::SuggestionKind;
use assistant::Core;
use config::Config;
use directory::{LinkGroup, LINK_GROUPS};
use liveness::{HttpProbe, LinkChecker};
use models::{ContactUpdate, NewApplication, Status, EVENT_KINDS, SOURCES};
use scoring::MatchTier;
use store::Tracker;

#[derive(Parser)]
#[command(name = "jobhub")]
#[command(about = "Job search hub - track applications, score postings, and open the right job boards")]
struct Cli {
    /// Tracker file (overrides JOBHUB_DATA_FILE)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Track a new application
    Add {
        /// Company or institution name
        company: String,

        /// Role or category
        #[arg(short, long, default_value = "")]
        role: String,

        /// Initial status (default: Waiting)
        #[arg(short, long)]
        status: Option<String>,

        /// Where the lead came from (LinkedIn, Direct search, Network, Job market portal, Other)
        #[arg(long, default_value = "")]
        source: String,
    },

    /// List tracked applications
    List {
        /// Only show applications with this status
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Show one application
    Show {
        /// Position in the list (1-based)
        number: usize,
    },

    /// Change the status of an application
    Status {
        /// Position in the list (1-based)
        number: usize,

        /// Waiting, In discussion, Interview, No response, Rejected, Interested, Offer
        status: String,
    },

    /// Set contact details
    Contact {
        /// Position in the list (1-based)
        number: usize,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },

    /// Schedule an interview (moves the application to Interview)
    Interview {
        /// Position in the list (1-based)
        number: usize,

        /// Date as YYYY-MM-DD
        date: String,

        /// Time of day, free form
        #[arg(short, long)]
        time: Option<String>,
    },

    /// Add a timeline event
    Event {
        /// Position in the list (1-based)
        number: usize,

        /// Email sent, Reply received, Interview, Follow-up, Other
        kind: String,

        #[arg(short, long, default_value = "")]
        note: String,
    },

    /// Replace the free-form notes of an application
    Note {
        /// Position in the list (1-based)
        number: usize,

        text: String,
    },

    /// Stop tracking an application
    Remove {
        /// Position in the list (1-based)
        number: usize,
    },

    /// Score a job posting against the target roles
    Score {
        /// Job title
        title: String,

        /// Location
        #[arg(short, long, default_value = "")]
        location: String,

        /// Posting text
        #[arg(short, long, conflicts_with = "description_file")]
        description: Option<String>,

        /// Read the posting text from a file
        #[arg(long)]
        description_file: Option<PathBuf>,
    },

    /// Show the link directory
    Links {
        /// Only one group (agencies, intl, nordic, media, courses)
        #[arg(short, long)]
        group: Option<String>,

        /// Probe every link and mark the ones that do not answer
        #[arg(short, long)]
        check: bool,

        /// Also print each site's favicon URL
        #[arg(long)]
        icons: bool,
    },

    /// Print the prepared power-search URLs
    Search,

    /// Follow-up reminders and suggestions
    Agent,

    /// Prepare an application letter
    Letter {
        /// File with the job posting
        #[arg(short, long)]
        job: PathBuf,

        /// File with your CV / background
        #[arg(short, long)]
        cv: PathBuf,

        /// Assistant core (Gemini, ChatGPT, Claude, Copilot)
        #[arg(long, default_value = "Gemini")]
        core: String,
    },

    /// Show the visitor count from the shared spreadsheet
    Visitors {
        /// CSV export URL (overrides JOBHUB_VISITOR_CSV_URL)
        #[arg(short, long)]
        url: Option<String>,
    },

    /// List training courses
    Courses,

    /// Print the portfolio link, or link a work sample to an application
    Portfolio {
        /// Application to link the sample to (1-based)
        #[arg(short, long, requires = "section")]
        app: Option<usize>,

        /// Video CV, Showreel, Case: Brand renewal, Case: Social media campaign, Other
        #[arg(short, long, requires = "app")]
        section: Option<String>,

        /// How the sample supports the application
        #[arg(short, long, requires = "app")]
        note: Option<String>,
    },

    /// Browse the tracker interactively
    Browse,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Convert a 1-based list position into an index.
fn to_index(number: usize) -> Result<usize> {
    if number == 0 {
        bail!("Application numbers start at 1");
    }
    Ok(number - 1)
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::from_env();
    if let Some(file) = cli.file {
        config.data_file = file;
    }
    info!(data_file = %config.data_file.display(), "configuration loaded");

    match cli.command {
        Commands::Add {
            company,
            role,
            status,
            source,
        } => {
            let status = status.as_deref().map(str::parse::<Status>).transpose()?;
            if !source.is_empty() && !SOURCES.iter().any(|s| s.eq_ignore_ascii_case(&source)) {
                warn!(source = %source, "unusual source, storing as entered");
            }
            let mut tracker = Tracker::open(&config.data_file);
            let index = tracker.add(
                NewApplication {
                    company: company.clone(),
                    role,
                    status,
                    source,
                },
                today(),
            )?;
            println!("Added #{} {} to {}", index + 1, company.trim(), tracker.path().display());
            report_unsaved(&tracker);
        }

        Commands::List { status } => {
            let filter = status.as_deref().map(str::parse::<Status>).transpose()?;
            let tracker = Tracker::open(&config.data_file);
            let today = today();
            let rows: Vec<_> = tracker
                .applications()
                .iter()
                .enumerate()
                .filter(|(_, app)| filter.is_none_or(|s| app.status == s))
                .collect();

            if rows.is_empty() {
                println!("No applications found.");
            } else {
                println!("{:<4} {:<24} {:<24} {:<14} {:<7} {:<12}", "#", "COMPANY", "ROLE", "STATUS", "DATE", "NEXT");
                println!("{}", "-".repeat(90));
                for (i, app) in rows {
                    let next = agent::interview_badge(app, today).unwrap_or_default();
                    println!(
                        "{:<4} {:<24} {:<24} {:<14} {:<7} {:<12}",
                        i + 1,
                        truncate(&app.company, 22),
                        truncate(&app.role, 22),
                        app.status,
                        app.date,
                        next
                    );
                }
            }
        }

        Commands::Show { number } => {
            let tracker = Tracker::open(&config.data_file);
            let index = to_index(number)?;
            let app = tracker.get(index)?;

            println!("#{} {}", number, app.company);
            if !app.role.is_empty() {
                println!("Role: {}", app.role);
            }
            println!("Status: {}", app.status);
            println!("Added: {}", app.date);
            if !app.source.is_empty() {
                println!("Source: {}", app.source);
            }
            if !app.interview_date.is_empty() {
                let badge = agent::interview_badge(app, today()).unwrap_or_default();
                println!("Interview: {} {} ({})", app.interview_date, app.interview_time, badge);
            }
            if app.has_contact() {
                println!("Contact: {} {} {}", app.contact_name, app.contact_phone, app.contact_email);
            }
            if !app.timeline.is_empty() {
                println!("\n--- Timeline ---");
                for event in &app.timeline {
                    if event.note.is_empty() {
                        println!("{} - {}", event.date, event.event);
                    } else {
                        println!("{} - {}: {}", event.date, event.event, event.note);
                    }
                }
            }
            if !app.notes.is_empty() {
                println!("\n--- Notes ---\n{}", textwrap::fill(&app.notes, 80));
            }
        }

        Commands::Status { number, status } => {
            let status: Status = status.parse()?;
            let mut tracker = Tracker::open(&config.data_file);
            tracker.set_status(to_index(number)?, status)?;
            println!("#{} is now {}.", number, status);
            report_unsaved(&tracker);
        }

        Commands::Contact {
            number,
            name,
            phone,
            email,
        } => {
            if name.is_none() && phone.is_none() && email.is_none() {
                bail!("Nothing to update. Use --name, --phone, or --email");
            }
            let mut tracker = Tracker::open(&config.data_file);
            tracker.update_contact(to_index(number)?, ContactUpdate { name, phone, email })?;
            println!("Contact details of #{} updated.", number);
            report_unsaved(&tracker);
        }

        Commands::Interview { number, date, time } => {
            let mut tracker = Tracker::open(&config.data_file);
            let index = to_index(number)?;
            tracker.schedule_interview(index, &date, time.as_deref())?;
            let badge = agent::interview_badge(tracker.get(index)?, today()).unwrap_or_default();
            println!("Interview for #{} scheduled on {} ({}).", number, date, badge);
            report_unsaved(&tracker);
        }

        Commands::Event { number, kind, note } => {
            let kind = EVENT_KINDS
                .iter()
                .find(|k| k.eq_ignore_ascii_case(kind.trim()))
                .map(|k| k.to_string())
                .unwrap_or(kind);
            let mut tracker = Tracker::open(&config.data_file);
            tracker.add_event(to_index(number)?, &kind, &note, today())?;
            println!("Added '{}' to the timeline of #{}.", kind, number);
            report_unsaved(&tracker);
        }

        Commands::Note { number, text } => {
            let mut tracker = Tracker::open(&config.data_file);
            tracker.set_notes(to_index(number)?, &text)?;
            println!("Notes of #{} updated.", number);
            report_unsaved(&tracker);
        }

        Commands::Remove { number } => {
            let mut tracker = Tracker::open(&config.data_file);
            let removed = tracker.remove(to_index(number)?)?;
            println!("Removed #{} {}.", number, removed.company);
            report_unsaved(&tracker);
        }

        Commands::Score {
            title,
            location,
            description,
            description_file,
        } => {
            let description = match description_file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read posting: {}", path.display()))?,
                None => description.unwrap_or_default(),
            };

            let score = scoring::match_score(&title, &location, &description);
            let tier = MatchTier::from_score(score);
            println!("Match score: {:.1}/5.0", score);
            println!("{}", scoring::progress_bar(score, 30));

            if description.trim().is_empty() {
                println!("\nPaste the posting text (--description) for a verdict.");
            } else {
                println!("\n{}: {}", capitalize(tier.label()), tier.verdict());
                println!("(Local keyword comparison, no external calls.)");
            }
        }

        Commands::Links { group, check, icons } => {
            let groups: Vec<&LinkGroup> = match group.as_deref() {
                Some(key) => vec![directory::find_group(key).with_context(|| {
                    format!("Unknown group '{}'. Available: agencies, intl, nordic, media, courses", key)
                })?],
                None => LINK_GROUPS.iter().collect(),
            };

            if check {
                let checker = LinkChecker::new(HttpProbe::new(config.probe_timeout)?, config.link_ttl)
                    .with_cache_file(&config.link_cache_file);
                let mut unavailable = 0;
                for group in groups {
                    println!("\n{}", group.title);
                    for status in checker.check_all(group.links) {
                        let mark = if status.live { "ok " } else { "!! " };
                        if !status.live {
                            unavailable += 1;
                        }
                        println!("  {} {:<30} {}", mark, status.name, status.url);
                    }
                }
                if unavailable > 0 {
                    println!("\nWarning: {} link(s) did not answer and may be out of date.", unavailable);
                }
            } else {
                for group in groups {
                    println!("\n{}", group.title);
                    for link in group.links {
                        println!("  {:<30} {}", link.name, link.url);
                        if icons {
                            if let Some(icon) = directory::favicon_url(link.url) {
                                println!("  {:<30} {}", "", icon);
                            }
                        }
                    }
                }
            }
        }

        Commands::Search => {
            println!("LinkedIn (Helsinki + creative roles):\n  {}", directory::linkedin_search_url());
            println!("\nJob market portal (Uusimaa):\n  {}", directory::job_market_search_url());
            println!("\nKeywords: {}", directory::SEARCH_KEYWORDS.join(", "));
        }

        Commands::Agent => {
            let tracker = Tracker::open(&config.data_file);
            let mut rng = rand::thread_rng();
            for suggestion in agent::suggestions(tracker.applications(), today(), &mut rng) {
                let marker = match suggestion.kind {
                    SuggestionKind::FollowUp | SuggestionKind::Tracking => "!",
                    SuggestionKind::Focus => ">",
                    SuggestionKind::Tip => "*",
                    SuggestionKind::AllClear | SuggestionKind::Hint => "-",
                };
                println!("{} {}", marker, suggestion.text);
            }
        }

        Commands::Letter { job, cv, core } => {
            let core: Core = core.parse()?;
            let job_text = std::fs::read_to_string(&job)
                .with_context(|| format!("Failed to read job posting: {}", job.display()))?;
            let cv_text = std::fs::read_to_string(&cv)
                .with_context(|| format!("Failed to read CV: {}", cv.display()))?;

            let prompt = assistant::build_prompt(core, &job_text, &cv_text)?;
            let generator = assistant::generator_for(config.api_key.as_deref());

            let role = if core.is_primary() { "primary" } else { "secondary" };
            println!("Core: {} ({}, {})", core, core.provider(), role);
            if generator.is_remote() {
                match generator.generate(&prompt) {
                    Ok(letter) => {
                        println!("\n{}", letter);
                        return Ok(());
                    }
                    Err(e) => warn!(error = %format!("{e:#}"), "generation failed, showing the prompt instead"),
                }
            } else {
                println!("Offline mode: no API key configured, nothing is sent anywhere.");
            }
            println!("\nPrepared prompt, paste it into the assistant of your choice:\n");
            println!("{}", prompt);
        }

        Commands::Visitors { url } => match url.or(config.visitor_csv_url) {
            Some(url) => match visitors::fetch_visitor_count(&url) {
                Some(count) => println!("Visitors: {}", count),
                None => println!("Warning: visitor count unavailable."),
            },
            None => println!("Visitor counter not configured. Set JOBHUB_VISITOR_CSV_URL or pass --url."),
        },

        Commands::Courses => {
            for link in directory::COURSES {
                println!("{:<32} {}", link.name, link.url);
            }
        }

        Commands::Portfolio { app, section, note } => match (app, section) {
            (Some(number), Some(section)) => {
                let event = portfolio_event(&section)?;
                let mut tracker = Tracker::open(&config.data_file);
                let index = to_index(number)?;
                tracker.add_event(index, &event, note.as_deref().unwrap_or("").trim(), today())?;
                println!("Linked '{}' to #{} {}.", event, number, tracker.get(index)?.company);
                report_unsaved(&tracker);
            }
            _ => {
                println!("Portfolio & CV: {}", directory::PORTFOLIO_URL);
                println!("\nLink a sample to an application with --app N --section S --note TEXT.");
                println!("Sections: {}", directory::PORTFOLIO_SECTIONS.join(", "));
            }
        },

        Commands::Browse => {
            let mut tracker = Tracker::open(&config.data_file);
            tui::run_browse(&mut tracker, today())?;
            report_unsaved(&tracker);
        }
    }

    Ok(())
}

/// Mutations keep going when the file cannot be written; say so on stdout.
fn report_unsaved(tracker: &Tracker) {
    if let Some(error) = tracker.save_error() {
        println!("Warning: not saved to {}: {}", tracker.path().display(), error);
    }
}

/// Timeline event text for a work sample taken from the portfolio.
fn portfolio_event(section: &str) -> Result<String> {
    let section = directory::portfolio_section(section).with_context(|| {
        format!("Unknown portfolio section '{}'. Available: {}", section, directory::PORTFOLIO_SECTIONS.join(", "))
    })?;
    Ok(format!("Portfolio: {section}"))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_to_index_is_one_based() {
        assert_eq!(to_index(1).unwrap(), 0);
        assert!(to_index(0).is_err());
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("Journalistiliiton työpaikat", 10), "Journal...");
        assert_eq!(truncate("SEK", 10), "SEK");
        assert_eq!(truncate("ääääääääääää", 6), "äää...");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("strong match"), "Strong match");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_portfolio_event() {
        assert_eq!(portfolio_event("showreel").unwrap(), "Portfolio: Showreel");
        assert_eq!(portfolio_event("brand renewal").unwrap(), "Portfolio: Case: Brand renewal");
        assert!(portfolio_event("podcast").unwrap_err().to_string().contains("Video CV"));
    }

    #[test]
    fn test_portfolio_link_needs_app_and_section() {
        assert!(Cli::try_parse_from(["jobhub", "portfolio"]).is_ok());
        assert!(Cli::try_parse_from(["jobhub", "portfolio", "--app", "2", "--section", "Showreel", "--note", "motion work"]).is_ok());
        assert!(Cli::try_parse_from(["jobhub", "portfolio", "--app", "2"]).is_err());
        assert!(Cli::try_parse_from(["jobhub", "portfolio", "--note", "orphan"]).is_err());
    }
}
