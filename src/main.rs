/// amp-url-api - command line front end for the AMP URL API client
///
/// Reads `AMP_API_KEY` and `AMP_RSA_PRIVATE_KEY` (or a `.env` file) and runs a
/// single operation, printing the result to stdout.
use amp_url_api::{
    cache::{DEFAULT_ACTION, DEFAULT_CONTENT_TYPE},
    AmpApi, AmpConfig, BatchGetOutput, BatchGetRequest, HttpResponse, ParsedBody,
};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "amp-url-api", version, about = "Google AMP URL API client")]
struct Args {
    /// Google API key (defaults to AMP_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// PEM private key for cache updates (defaults to AMP_RSA_PRIVATE_KEY)
    #[arg(long)]
    key_path: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch the API discovery document
    Discover,
    /// List the registered AMP caches
    Caches,
    /// Validate the AMP page at a URL
    Validate { url: String },
    /// Ask every AMP cache to update a URL
    UpdateCache {
        url: String,
        #[arg(long, default_value = DEFAULT_CONTENT_TYPE)]
        content_type: String,
        #[arg(long, default_value = DEFAULT_ACTION)]
        action: String,
        /// Print the signed URLs instead of requesting them
        #[arg(long)]
        dry_run: bool,
    },
    /// Look up AMP URLs for canonical URLs
    BatchGet {
        #[arg(long, default_value = "FETCH_LIVE_DOC")]
        strategy: String,
        #[arg(required = true)]
        urls: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "amp_url_api=info".into());
    if args.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let mut config = AmpConfig::from_env()?;
    if let Some(api_key) = args.api_key {
        config.api_key = Some(api_key);
    }
    if let Some(key_path) = args.key_path {
        config.key_path = Some(key_path.into());
    }

    let api = AmpApi::builder()
        .config(config)
        .logger(std::sync::Arc::new(amp_url_api::TracingLogger))
        .build()?;

    match args.command {
        Command::Discover => print_parsed(api.discover().await?)?,
        Command::Caches => print_parsed(api.get_amp_caches().await?)?,
        Command::Validate { url } => {
            let status = api.validate_amp_url(&url).await?;
            println!("{}", status);
        }
        Command::UpdateCache {
            url,
            content_type,
            action,
            dry_run,
        } => {
            if dry_run {
                for signed in api.signed_cache_urls(&url, &content_type, &action).await? {
                    println!("{}", signed);
                }
            } else {
                let responses = api.update_cache(&url, &content_type, &action).await?;
                info!("Updated {} AMP caches", responses.len());
                print_responses(&responses);
            }
        }
        Command::BatchGet { strategy, urls } => {
            let request = BatchGetRequest::new(urls).with_strategy(strategy);
            match api.batch_get(request).await? {
                BatchGetOutput::Single(parsed) => print_parsed(parsed)?,
                BatchGetOutput::Grouped(responses) => print_responses(&responses),
            }
        }
    }

    Ok(())
}

fn print_parsed(parsed: ParsedBody) -> anyhow::Result<()> {
    match parsed {
        ParsedBody::Json(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        ParsedBody::Raw(response) => print_responses(&[response]),
    }
    Ok(())
}

fn print_responses(responses: &[HttpResponse]) {
    for response in responses {
        println!("{} {}", response.status, response.body);
    }
}
