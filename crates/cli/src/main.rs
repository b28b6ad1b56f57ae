use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "commentbot")]
#[command(about = "LinkedIn comment auto-responder", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Run the webhook server. Secrets come from the environment (or .env) and the config file.
    Serve {
        /// Config file path (default: COMMENTBOT_CONFIG_PATH or ~/.commentbot/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// HTTP port (default from PORT, config, or 3000)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Compute (or check) the webhook challenge response for a challenge code, as the server would.
    Challenge {
        /// Challenge code sent by LinkedIn.
        code: String,

        /// Secret to sign with (default: LINKEDIN_CLIENT_SECRET or linkedin.clientSecret from config)
        #[arg(long)]
        secret: Option<String>,

        /// Expected response to compare against instead of printing the computed one.
        #[arg(long, value_name = "RESPONSE")]
        verify: Option<String>,

        /// Config file path (default: COMMENTBOT_CONFIG_PATH or ~/.commentbot/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("commentbot {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Serve { config, port }) => {
            if let Err(e) = run_serve(config, port).await {
                log::error!("server failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Challenge {
            code,
            secret,
            verify,
            config,
        }) => match run_challenge(&code, secret, verify, config) {
            Ok(true) => {}
            Ok(false) => std::process::exit(2),
            Err(e) => {
                log::error!("challenge failed: {:#}", e);
                std::process::exit(1);
            }
        },
        None => {
            println!("Run with --help for usage");
        }
    }
}

async fn run_serve(
    config_path: Option<std::path::PathBuf>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let (config, path) = commentbot::config::load_config(config_path)?;
    log::debug!("using config {}", path.display());
    let mut settings = commentbot::config::Settings::resolve(&config)?;
    if let Some(p) = port {
        settings.port = p;
    }
    log::info!("starting webhook server on {}", settings.bind_addr());
    commentbot::webhook::run_server(settings).await
}

/// Prints the response, or with `verify` reports whether it matches. Returns false on mismatch.
fn run_challenge(
    code: &str,
    secret: Option<String>,
    verify: Option<String>,
    config_path: Option<std::path::PathBuf>,
) -> anyhow::Result<bool> {
    let secret = match secret {
        Some(s) => s,
        None => {
            let (config, _) = commentbot::config::load_config(config_path)?;
            commentbot::config::resolve_webhook_secret(&config).ok_or_else(|| {
                anyhow::anyhow!("no secret given and LINKEDIN_CLIENT_SECRET / linkedin.clientSecret unset")
            })?
        }
    };
    match verify {
        Some(expected) => {
            let ok = commentbot::webhook::verify_challenge_response(code, &secret, &expected);
            println!("{}", if ok { "match" } else { "mismatch" });
            Ok(ok)
        }
        None => {
            println!("{}", commentbot::webhook::challenge_response(code, &secret));
            Ok(true)
        }
    }
}
