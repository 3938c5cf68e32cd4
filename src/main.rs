use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::Layer as _;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use updatebot::App;
use updatebot::platform;
use updatebot::platform::Platform as _;
use updatebot::platform::PlatformKind;
use updatebot::platform::types::PlatformParams;

#[derive(Parser)]
#[command(name = "updatebot")]
#[command(about = "Platform layer for automated dependency updates over local git repositories", long_about = None)]
pub struct Cli {
    /// Hosting backend to run against
    #[arg(long, global = true, default_value = "local")]
    pub platform: PlatformKind,

    /// Root directory under which repositories are resolved (defaults to the
    /// home directory)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Discover repositories under the endpoint
    Repos,
    /// Establish a repository session and show its default branch
    Init { repository: String },
    /// Show the aggregate status of a branch
    Status { repository: String, branch: String },
    /// Print a file from a repository
    File {
        repository: String,
        file_name: String,
        /// Parse before printing (JSON, or JSON5 for .json5 files)
        #[arg(long)]
        json: bool,
    },
    /// Resolve a shareable config preset
    Preset {
        repository: String,
        preset: String,
        /// Subdirectory holding preset files
        #[arg(long)]
        path: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let cli = Cli::parse();

    let mut platform = platform::create(cli.platform);
    let platform_config = platform
        .init_platform(PlatformParams {
            endpoint: cli.endpoint,
            ..Default::default()
        })
        .await?;
    let app = App::new(platform, platform_config.endpoint);

    match cli.command {
        Commands::Repos => app.cmd_repos(&mut std::io::stdout()).await?,
        Commands::Init { repository } => {
            app.cmd_init(&repository, &mut std::io::stdout()).await?
        }
        Commands::Status { repository, branch } => {
            app.cmd_status(&repository, &branch, &mut std::io::stdout())
                .await?
        }
        Commands::File {
            repository,
            file_name,
            json,
        } => {
            app.cmd_file(&repository, &file_name, json, &mut std::io::stdout())
                .await?
        }
        Commands::Preset {
            repository,
            preset,
            path,
        } => {
            app.cmd_preset(&repository, &preset, path.as_deref(), &mut std::io::stdout())
                .await?
        }
    }

    Ok(())
}

fn setup_logging() -> Result<()> {
    let timer = tracing_subscriber::fmt::time::ChronoLocal::new("%H:%M:%S%.3f".into());
    let format = tracing_subscriber::fmt::format().with_timer(timer);
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env()?;
    let subscriber = tracing_subscriber::fmt::layer()
        .event_format(format)
        .with_filter(filter);
    tracing_subscriber::registry().with(subscriber).init();
    Ok(())
}
