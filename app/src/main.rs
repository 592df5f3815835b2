//! Agency console
//!
//! Command-line front end over the agency store. Every invocation opens
//! the store, seeds it on first run, logs in with the given credentials
//! and runs one command.

mod commands;
mod state;

use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use agency_core::{
    Config, InsuranceCompany, PolicyDraft, PolicyFilter, PolicyStatus, UserDraft, UserRole,
};
use commands::{emit, emit_result, CommandResult};
use state::AppState;

#[derive(Parser)]
#[command(name = "agency")]
#[command(about = "Insurance agency records console")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "AGENCY_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory (overrides the configured database location)
    #[arg(short, long, env = "AGENCY_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Login email
    #[arg(long, env = "AGENCY_EMAIL")]
    email: Option<String>,

    /// Login password
    #[arg(long, env = "AGENCY_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the store and seed demo data if it is empty
    Init,
    /// Show the logged-in account
    Whoami,
    /// Update your own name, phone or password
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        new_password: Option<String>,
    },
    /// Manage user accounts (admin only)
    #[command(subcommand)]
    Users(UserCommand),
    /// Browse and manage policies
    #[command(subcommand)]
    Policies(PolicyCommand),
    /// Show dashboard figures
    Dashboard,
    /// Export the full policy report as CSV
    Report {
        /// Output file or directory
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum UserCommand {
    List,
    /// Create a user, or edit one when --id names an existing account
    Save(UserArgs),
    Delete { id: String },
}

#[derive(Args)]
struct UserArgs {
    #[arg(long)]
    id: Option<String>,
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    role: Option<UserRole>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    user_password: Option<String>,
}

#[derive(Subcommand)]
enum PolicyCommand {
    List(FilterArgs),
    /// Create a policy, or edit one when --id names an existing policy
    Save(PolicyArgs),
    Delete { id: String },
    /// Policies whose customer no longer exists
    Orphans,
}

#[derive(Args)]
struct FilterArgs {
    /// Match policy number or insured name
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    company: Option<InsuranceCompany>,
    #[arg(long)]
    status: Option<PolicyStatus>,
    /// Earliest expiry date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Latest expiry date (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,
}

#[derive(Args)]
struct PolicyArgs {
    #[arg(long)]
    id: Option<String>,
    #[arg(long)]
    number: String,
    #[arg(long)]
    company: InsuranceCompany,
    #[arg(long)]
    insured: String,
    #[arg(long)]
    customer: String,
    /// YYYY-MM-DD
    #[arg(long)]
    expiry: String,
    #[arg(long)]
    premium: f64,
    #[arg(long)]
    document_url: Option<String>,
}

impl From<FilterArgs> for PolicyFilter {
    fn from(args: FilterArgs) -> Self {
        let mut filter = PolicyFilter::new().expiring_between(args.from, args.to);
        if let Some(term) = args.search {
            filter = filter.search(term);
        }
        filter.company = args.company;
        filter.status = args.status;
        filter
    }
}

impl From<PolicyArgs> for PolicyDraft {
    fn from(args: PolicyArgs) -> Self {
        PolicyDraft {
            id: args.id,
            policy_number: args.number,
            company: args.company,
            insured_name: args.insured,
            customer_id: args.customer,
            expiry_date: args.expiry,
            premium_amount: args.premium,
            document_url: args.document_url,
        }
    }
}

impl From<UserArgs> for UserDraft {
    fn from(args: UserArgs) -> Self {
        UserDraft {
            id: args.id,
            name: args.name,
            email: args.email,
            role: args.role,
            phone: args.phone,
            password: args.user_password,
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("parsing config file {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(dir) = &cli.data_dir {
        config.database_path = Config::new(dir.clone()).database_path;
    }

    Ok(config)
}

fn main() -> anyhow::Result<()> {
    agency_core::init_logging();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    tracing::debug!(database = %config.database_path.display(), "Opening agency store");

    let mut state = AppState::new(config)?;
    state.initialize()?;

    if !matches!(cli.command, Command::Init) {
        let (Some(email), Some(password)) = (cli.email.as_deref(), cli.password.as_deref())
        else {
            anyhow::bail!(
                "--email and --password (or AGENCY_EMAIL / AGENCY_PASSWORD) are required"
            );
        };
        if let Err(e) = state.login(email, password) {
            emit(CommandResult::<bool>::err(e.to_string()), cli.json)?;
            std::process::exit(1);
        }
    }

    let json = cli.json;
    let ok = match cli.command {
        Command::Init => emit(CommandResult::ok(true), json)?,
        Command::Whoami => emit_result(commands::profile::whoami(&state), json)?,
        Command::Profile {
            name,
            phone,
            new_password,
        } => emit_result(
            commands::profile::update_profile(&state, name, phone, new_password),
            json,
        )?,
        Command::Users(UserCommand::List) => {
            emit_result(commands::users::list_users(&state), json)?
        }
        Command::Users(UserCommand::Save(args)) => {
            emit_result(commands::users::save_user(&state, args.into()), json)?
        }
        Command::Users(UserCommand::Delete { id }) => {
            emit_result(commands::users::delete_user(&state, &id), json)?
        }
        Command::Policies(PolicyCommand::List(args)) => {
            let filter = PolicyFilter::from(args);
            emit_result(commands::policies::list_policies(&state, &filter), json)?
        }
        Command::Policies(PolicyCommand::Save(args)) => {
            emit_result(commands::policies::save_policy(&state, args.into()), json)?
        }
        Command::Policies(PolicyCommand::Delete { id }) => {
            emit_result(commands::policies::delete_policy(&state, &id), json)?
        }
        Command::Policies(PolicyCommand::Orphans) => {
            emit_result(commands::policies::orphaned_policies(&state), json)?
        }
        Command::Dashboard => emit_result(commands::reports::dashboard(&state), json)?,
        Command::Report { out } => {
            emit_result(commands::reports::write_report(&state, out.as_deref()), json)?
        }
    };

    if !ok {
        std::process::exit(1);
    }

    Ok(())
}
