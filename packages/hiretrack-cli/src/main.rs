//! Command-line client for the HireTrack API.
//!
//! Results are printed to stdout as pretty JSON; logs go to stderr so the
//! output can be piped.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use hiretrack::{
    ApplicantStatus, AuthStore, Config, EmploymentType, HireTrack, ListFilters, NewApplicant,
    NewPosition, PositionStatus, PositionUpdate, SortOrder, UserProfile, UserType,
};
use serde::Serialize;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "hiretrack")]
#[command(about = "Manage HireTrack applicants and positions")]
struct Cli {
    /// Overrides HIRETRACK_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Overrides HIRETRACK_TIMEOUT_MS
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a session token and profile
    Login {
        #[arg(long)]
        token: String,
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "recruiter")]
        user_type: UserType,
    },

    /// Forget the stored session
    Logout,

    /// Show the stored profile
    Whoami,

    /// Print Set-Cookie values for the stored session
    Cookies,

    #[command(subcommand)]
    Applicants(ApplicantCommands),

    #[command(subcommand)]
    Positions(PositionCommands),
}

#[derive(Args)]
struct ListArgs {
    #[arg(long)]
    department: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    limit: Option<u32>,
    #[arg(long)]
    sort_by: Option<String>,
    #[arg(long, requires = "sort_by")]
    order: Option<SortOrder>,
}

impl ListArgs {
    fn into_filters<S>(self, status: Option<S>, employment_type: Option<EmploymentType>) -> ListFilters<S> {
        let sort_order = self.sort_by.as_ref().map(|_| self.order.unwrap_or_default());
        ListFilters {
            status,
            department: self.department,
            location: self.location,
            employment_type,
            search: self.search,
            page: self.page,
            limit: self.limit,
            sort_by: self.sort_by,
            sort_order,
        }
    }
}

#[derive(Subcommand)]
enum ApplicantCommands {
    /// List applicants
    List {
        #[arg(long)]
        status: Option<ApplicantStatus>,
        #[arg(long = "type")]
        employment_type: Option<EmploymentType>,
        #[command(flatten)]
        list: ListArgs,
    },

    /// Show one applicant
    Get { id: String },

    /// Create an applicant
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        position_id: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        resume_url: Option<String>,
        #[arg(long)]
        cover_letter: Option<String>,
    },

    /// Move an applicant to a new pipeline stage
    SetStatus { id: String, status: ApplicantStatus },

    Delete { id: String },

    DeleteBatch {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[derive(Subcommand)]
enum PositionCommands {
    /// List positions
    List {
        #[arg(long)]
        status: Option<PositionStatus>,
        #[arg(long = "type")]
        employment_type: Option<EmploymentType>,
        #[command(flatten)]
        list: ListArgs,
    },

    /// Show one position
    Get { id: String },

    /// Create a position
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        department: String,
        #[arg(long)]
        location: String,
        #[arg(long = "type", default_value = "full-time")]
        employment_type: EmploymentType,
        #[arg(long)]
        status: Option<PositionStatus>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        salary_min: Option<u32>,
        #[arg(long)]
        salary_max: Option<u32>,
    },

    /// Change the given fields of a position
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long = "type")]
        employment_type: Option<EmploymentType>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        salary_min: Option<u32>,
        #[arg(long)]
        salary_max: Option<u32>,
    },

    SetStatus { id: String, status: PositionStatus },

    Delete { id: String },

    DeleteBatch {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,hiretrack=debug,api_client=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    if let Some(ms) = cli.timeout_ms {
        config.timeout = Duration::from_millis(ms);
    }

    info!(
        api_url = %config.api_url,
        timeout_ms = config.timeout.as_millis() as u64,
        "Using HireTrack API"
    );
    let hiretrack = HireTrack::from_config(&config).context("Failed to create API client")?;

    match cli.command {
        Commands::Login {
            token,
            id,
            name,
            email,
            user_type,
        } => {
            let profile = UserProfile {
                id,
                name,
                email,
                user_type,
            };
            hiretrack
                .auth
                .save_session(&token, &profile)
                .context("Failed to save session")?;
            info!(user_id = %profile.id, user_type = %profile.user_type, "Session stored");
            eprintln!("{} Signed in as {} ({})", "✓".green(), profile.name, profile.user_type);
        }
        Commands::Logout => {
            hiretrack.auth.clear().context("Failed to clear session")?;
            info!("Session cleared");
            eprintln!("{} Signed out", "✓".green());
        }
        Commands::Whoami => match hiretrack.auth.user().context("Failed to read session")? {
            Some(profile) => print_json(&profile)?,
            None => eprintln!("{}", "Not signed in".yellow()),
        },
        Commands::Cookies => {
            let cookies = if hiretrack.auth.is_authenticated()? {
                hiretrack.auth.cookies()?
            } else {
                AuthStore::clear_cookies()
            };
            for cookie in cookies {
                println!("Set-Cookie: {}", cookie);
            }
        }
        Commands::Applicants(cmd) => run_applicants(&hiretrack, cmd).await?,
        Commands::Positions(cmd) => run_positions(&hiretrack, cmd).await?,
    }

    Ok(())
}

async fn run_applicants(hiretrack: &HireTrack, cmd: ApplicantCommands) -> Result<()> {
    let service = &hiretrack.applicants;

    match cmd {
        ApplicantCommands::List {
            status,
            employment_type,
            list,
        } => {
            let page = service.list(&list.into_filters(status, employment_type)).await?;
            print_json(&page)?;
        }
        ApplicantCommands::Get { id } => print_json(&service.get(&id).await?)?,
        ApplicantCommands::Create {
            name,
            email,
            position_id,
            phone,
            resume_url,
            cover_letter,
        } => {
            let applicant = NewApplicant {
                name,
                email,
                phone,
                position_id,
                resume_url,
                cover_letter,
            };
            print_entity(service.create(&applicant).await?, "Applicant created")?;
        }
        ApplicantCommands::SetStatus { id, status } => {
            print_entity(service.update_status(&id, status).await?, "Status updated")?;
        }
        ApplicantCommands::Delete { id } => {
            service.delete(&id).await?;
            eprintln!("{} Deleted applicant {}", "✓".green(), id);
        }
        ApplicantCommands::DeleteBatch { ids } => {
            service.delete_batch(&ids).await?;
            info!(count = ids.len(), "Applicants deleted");
            eprintln!("{} Deleted {} applicants", "✓".green(), ids.len());
        }
    }

    Ok(())
}

async fn run_positions(hiretrack: &HireTrack, cmd: PositionCommands) -> Result<()> {
    let service = &hiretrack.positions;

    match cmd {
        PositionCommands::List {
            status,
            employment_type,
            list,
        } => {
            let page = service.list(&list.into_filters(status, employment_type)).await?;
            print_json(&page)?;
        }
        PositionCommands::Get { id } => print_json(&service.get(&id).await?)?,
        PositionCommands::Create {
            title,
            department,
            location,
            employment_type,
            status,
            description,
            salary_min,
            salary_max,
        } => {
            let position = NewPosition {
                title,
                department,
                location,
                employment_type,
                status,
                description,
                salary_min,
                salary_max,
            };
            print_entity(service.create(&position).await?, "Position created")?;
        }
        PositionCommands::Update {
            id,
            title,
            department,
            location,
            employment_type,
            description,
            salary_min,
            salary_max,
        } => {
            let changes = PositionUpdate {
                title,
                department,
                location,
                employment_type,
                status: None,
                description,
                salary_min,
                salary_max,
            };
            print_entity(service.update(&id, &changes).await?, "Position updated")?;
        }
        PositionCommands::SetStatus { id, status } => {
            print_entity(service.update_status(&id, status).await?, "Status updated")?;
        }
        PositionCommands::Delete { id } => {
            service.delete(&id).await?;
            eprintln!("{} Deleted position {}", "✓".green(), id);
        }
        PositionCommands::DeleteBatch { ids } => {
            service.delete_batch(&ids).await?;
            info!(count = ids.len(), "Positions deleted");
            eprintln!("{} Deleted {} positions", "✓".green(), ids.len());
        }
    }

    Ok(())
}

/// Print the echoed entity, or a note when the API accepted without one.
fn print_entity<T: Serialize>(entity: Option<T>, done: &str) -> Result<()> {
    match entity {
        Some(entity) => print_json(&entity),
        None => {
            eprintln!("{} {} (no record returned)", "✓".green(), done);
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
