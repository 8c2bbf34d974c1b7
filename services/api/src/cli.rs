use crate::infra;
use crate::jobs::{run_jobs, JobsArgs};
use crate::seed::{run_seed, SeedArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use swipe::accounts::domain::Registration;
use swipe::error::AppError;
use swipe::{calendar, AccountService};

#[derive(Parser, Debug)]
#[command(
    name = "swipe-api",
    about = "Serve and operate the Swipe real-estate classifieds backend",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run one or all expiry sweeps once, for an external scheduler
    Jobs(JobsArgs),
    /// Create a staff account
    CreateSuperuser(SuperuserArgs),
    /// Fill the store with demo accounts and announcements
    Seed(SeedArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct SuperuserArgs {
    #[arg(long)]
    pub(crate) email: String,
    #[arg(long)]
    pub(crate) first_name: String,
    #[arg(long)]
    pub(crate) last_name: String,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Jobs(args) => run_jobs(args),
        Command::CreateSuperuser(args) => create_superuser(args),
        Command::Seed(args) => run_seed(args),
    }
}

fn create_superuser(args: SuperuserArgs) -> Result<(), AppError> {
    let config = infra::load_config()?;
    let store = infra::open_store(&config.store)?;

    let user = AccountService::new(store).create_superuser(
        Registration {
            email: args.email,
            first_name: args.first_name,
            last_name: args.last_name,
            phone: None,
            is_developer: false,
        },
        calendar::today(),
    )?;

    println!("Superuser {} created with id {}", user.email, user.id);
    Ok(())
}
