use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use log::info;
use services::config::parse_timeout;
use services::{AppServices, DashboardService, GatewayConfig, QuizService, Store, StudyService};
use study_core::model::UserId;
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidValue { flag: &'static str, reason: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidValue { flag, reason } => write!(f, "invalid {flag} value: {reason}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn user_id(&self) -> UserId {
        self.services.user_id().clone()
    }

    fn store(&self) -> Arc<Store> {
        self.services.store()
    }

    fn study(&self) -> Arc<StudyService> {
        self.services.study()
    }

    fn quiz(&self) -> Arc<QuizService> {
        self.services.quiz()
    }

    fn dashboard(&self) -> Arc<DashboardService> {
        self.services.dashboard()
    }
}

/// Command-line overrides; anything left unset comes from the environment.
#[derive(Debug, Default)]
struct Args {
    api_url: Option<String>,
    user_id: Option<String>,
    upload_timeout: Option<Option<Duration>>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--api-url <url>] [--user-id <id>] [--upload-timeout <secs>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api-url {}", services::config::DEFAULT_BASE_URL);
    eprintln!("  --user-id {}", services::config::DEFAULT_USER_ID);
    eprintln!("  --upload-timeout 0  # no timeout");
    eprintln!();
    eprintln!("Environment (a .env file is read too):");
    eprintln!("  STUDY_API_BASE_URL, STUDY_USER_ID, STUDY_UPLOAD_TIMEOUT_SECS, RUST_LOG");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api-url" => {
                    parsed.api_url = Some(require_value(args, "--api-url")?);
                }
                "--user-id" => {
                    parsed.user_id = Some(require_value(args, "--user-id")?);
                }
                "--upload-timeout" => {
                    let value = require_value(args, "--upload-timeout")?;
                    let timeout = parse_timeout(&value).map_err(|err| ArgsError::InvalidValue {
                        flag: "--upload-timeout",
                        reason: err.to_string(),
                    })?;
                    parsed.upload_timeout = Some(timeout);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }

    fn into_config(self) -> Result<GatewayConfig, Box<dyn std::error::Error>> {
        let mut config = GatewayConfig::from_env()?;
        if let Some(url) = self.api_url {
            config = config.with_base_url(&url)?;
        }
        if let Some(user_id) = self.user_id {
            config = config.with_user_id(&user_id)?;
        }
        if let Some(timeout) = self.upload_timeout {
            config = config.with_upload_timeout(timeout);
        }
        Ok(config)
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    let config = parsed.into_config()?;
    info!(
        "using backend {} as {}",
        config.base_url(),
        config.user_id()
    );

    let services = AppServices::from_config(&config);
    let context = build_app_context(Arc::new(DesktopApp { services }));

    // Some dev setups open the window always-on-top unless told otherwise.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Study")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
