use anyhow::Result;
use clap::{Parser, ValueEnum};
use git_drift::app::{self, Config, OutputFormat};
use git_drift::scan::ScanOptions;
use git_drift::ui::Theme;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

#[derive(Parser)]
#[command(name = "git-drift", version)]
#[command(about = "Find git repositories with uncommitted work or drift from origin")]
struct Cli {
    /// Directory to scan for repositories
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Compare against existing remote-tracking refs without fetching
    #[arg(long)]
    no_fetch: bool,

    /// Seconds to wait for each fetch before giving up
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    fetch_timeout: u64,

    /// Repositories inspected in parallel (0 = one per CPU)
    #[arg(short, long, default_value_t = 0)]
    jobs: usize,

    #[arg(long, value_enum, default_value = "text")]
    format: Format,

    /// Colour and hyperlinks in text output
    #[arg(long, value_enum, default_value = "auto")]
    color: ColorChoice,

    /// git executable to invoke
    #[arg(long, env = "GIT_DRIFT_GIT", default_value = "git")]
    git: PathBuf,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn theme(&self) -> Theme {
        match self.color {
            ColorChoice::Always => Theme {
                color: true,
                hyperlinks: true,
            },
            ColorChoice::Never => Theme::plain(),
            ColorChoice::Auto => Theme {
                color: std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
                hyperlinks: supports_hyperlinks::on(supports_hyperlinks::Stream::Stdout),
            },
        }
    }

    fn into_config(self) -> Config {
        let theme = self.theme();
        Config {
            root: self.root,
            git: self.git,
            scan: ScanOptions {
                fetch: !self.no_fetch,
                fetch_timeout: Duration::from_secs(self.fetch_timeout),
                jobs: self.jobs,
            },
            format: match self.format {
                Format::Text => OutputFormat::Text,
                Format::Json => OutputFormat::Json,
            },
            theme,
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "git_drift=warn",
        1 => "git_drift=info",
        _ => "git_drift=debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Flag raised by the first SIGINT/SIGTERM; a second one exits immediately.
fn interrupt_flag() -> Result<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    #[cfg(unix)]
    {
        use signal_hook::consts::{SIGINT, SIGTERM};
        for signal in [SIGINT, SIGTERM] {
            signal_hook::flag::register_conditional_shutdown(signal, 130, Arc::clone(&flag))?;
            signal_hook::flag::register(signal, Arc::clone(&flag))?;
        }
    }
    Ok(flag)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let interrupt = interrupt_flag()?;
    app::run(&cli.into_config(), &interrupt)
}
