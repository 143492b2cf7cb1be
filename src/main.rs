//! # Butterfly-viz CLI
//!
//! Command-line interface for the butterfly-viz library.
//! Serves the route map over HTTP or renders it once to a file.

use std::path::PathBuf;

use anyhow::Context;
use butterfly_viz::{server, Config, MapComposer, StepFilter};
use clap::{Parser, Subcommand};
use log::{error, info, warn};

mod cli;

/// Command-line interface for butterfly-viz
#[derive(Parser)]
#[command(name = "butterfly-viz")]
#[command(about = "Driving and walking route alternatives on an interactive map")]
#[command(long_about = "Fetches driving and walking directions and renders them as a layered map:
  butterfly-viz                        # Serve the map on http://127.0.0.1:5000/
  butterfly-viz serve --port 8080      # Serve on another port
  butterfly-viz render                 # Write the map to trajet.html
  butterfly-viz render -               # Write the map to stdout

The GOOGLE_API_KEY environment variable (or .env entry) is required.")]
#[command(version = env!("BUTTERFLY_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Trip origin (address or place name)
    #[arg(long, global = true)]
    origin: Option<String>,

    /// Trip destination (address or place name)
    #[arg(long, global = true)]
    destination: Option<String>,

    /// Language of instructions and summaries
    #[arg(long, global = true)]
    language: Option<String>,

    /// Instruction keyword that earns a step marker (repeatable, replaces the defaults)
    #[arg(long = "turn-keyword", global = true)]
    turn_keywords: Vec<String>,

    /// Load environment variables from this file instead of `.env`
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the map on GET /
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value_t = 5000)]
        port: u16,
    },
    /// Render the map once
    Render {
        /// Output file path, or "-" for stdout
        #[arg(default_value = "trajet.html")]
        output: String,
    },
}

/// Output destination types
#[derive(Debug)]
enum OutputDestination {
    File(String),
    Stdout,
}

/// Resolve output destination from CLI arguments
fn resolve_output(output: &str) -> OutputDestination {
    if output == "-" {
        OutputDestination::Stdout
    } else {
        OutputDestination::File(output.to_string())
    }
}

/// Apply command-line overrides on top of the environment configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(origin) = &cli.origin {
        config.trip.origin = origin.clone();
    }
    if let Some(destination) = &cli.destination {
        config.trip.destination = destination.clone();
    }
    if let Some(language) = &cli.language {
        config.trip.language = language.clone();
    }
    if !cli.turn_keywords.is_empty() {
        config.step_filter = StepFilter::new(cli.turn_keywords.iter().cloned());
    }
}

/// Accept a missing `.env`, but surface every other load failure
fn check_dotenv<T>(result: Result<T, dotenvy::Error>) -> anyhow::Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            // Variables may come from the process environment directly
            warn!("⚠️  No .env file found");
            Ok(())
        }
        Err(e) => Err(e).context("load .env"),
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("❌ Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging to stderr
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();

    if let Some(path) = cli.env_file.as_deref() {
        dotenvy::from_path(path)
            .with_context(|| format!("load env file {}", path.display()))?;
    } else {
        check_dotenv(dotenvy::dotenv())?;
    }

    let mut config = Config::from_env().context("load configuration")?;
    apply_overrides(&mut config, &cli);

    info!("🚀 Butterfly-viz v{} starting...", env!("BUTTERFLY_VERSION"));
    let composer = MapComposer::new(config).context("create directions client")?;

    match cli.command {
        None => server::run_server(composer, "127.0.0.1:5000").await,
        Some(Command::Serve { host, port }) => {
            server::run_server(composer, &format!("{host}:{port}")).await
        }
        Some(Command::Render { output }) => render_once(&composer, resolve_output(&output)).await,
    }
}

/// Compose the map once and write it out
async fn render_once(composer: &MapComposer, output: OutputDestination) -> anyhow::Result<()> {
    let progress = match output {
        OutputDestination::File(_) => Some(cli::ProgressManager::new("🌐 Fetching routes")),
        OutputDestination::Stdout => None,
    };

    let html = composer.compose().await.to_html()?;

    match output {
        OutputDestination::File(path) => {
            tokio::fs::write(&path, html)
                .await
                .with_context(|| format!("write {path}"))?;
            if let Some(progress) = progress {
                progress.finish(&format!("✅ Map saved to {path}"));
            }
        }
        OutputDestination::Stdout => {
            use tokio::io::AsyncWriteExt;

            let mut stdout = tokio::io::stdout();
            stdout.write_all(html.as_bytes()).await?;
            stdout.flush().await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_output_stdout() {
        match resolve_output("-") {
            OutputDestination::Stdout => {}
            other => panic!("Expected stdout output, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_output_file() {
        match resolve_output("kinshasa.html") {
            OutputDestination::File(path) => assert_eq!(path, "kinshasa.html"),
            other => panic!("Expected file output, got {other:?}"),
        }
    }

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["butterfly-viz"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_serve_arguments() {
        let cli = Cli::try_parse_from(["butterfly-viz", "serve", "--port", "8080"]).unwrap();
        match cli.command {
            Some(Command::Serve { host, port }) => {
                assert_eq!(host, "127.0.0.1");
                assert_eq!(port, 8080);
            }
            _ => panic!("Expected serve command"),
        }
    }

    #[test]
    fn test_render_default_output() {
        let cli = Cli::try_parse_from(["butterfly-viz", "render"]).unwrap();
        match cli.command {
            Some(Command::Render { output }) => assert_eq!(output, "trajet.html"),
            _ => panic!("Expected render command"),
        }
    }

    #[test]
    fn test_apply_overrides() {
        let cli = Cli::try_parse_from([
            "butterfly-viz",
            "render",
            "--origin",
            "Place de la Gare, Kinshasa",
            "--language",
            "en",
            "--turn-keyword",
            "Turn",
            "--turn-keyword",
            "Keep",
        ])
        .unwrap();

        let mut config = Config::new("k");
        apply_overrides(&mut config, &cli);

        assert_eq!(config.trip.origin, "Place de la Gare, Kinshasa");
        assert_eq!(config.trip.destination, "Gare Centrale, Kinshasa");
        assert_eq!(config.trip.language, "en");
        assert_eq!(config.step_filter, StepFilter::new(["Turn", "Keep"]));
    }

    #[test]
    fn test_missing_env_file_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let result = dotenvy::from_path(dir.path().join(".env"));
        assert!(check_dotenv(result).is_ok());
    }

    #[test]
    fn test_malformed_env_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "BAD LINE WITHOUT EQUALS\nBUTTERFLY_VIZ_TEST_KEY=abc123\n").unwrap();

        let err = check_dotenv(dotenvy::from_path(&path)).unwrap_err();
        assert!(err.to_string().contains("load .env"));
        assert!(std::env::var("BUTTERFLY_VIZ_TEST_KEY").is_err());
    }

    #[tokio::test]
    async fn test_render_once_writes_file() {
        use serde_json::json;
        use wiremock::matchers::{method, path, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/maps/api/directions/json"))
            .and(query_param("mode", "driving"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "OK",
                "routes": [{
                    "summary": "Boulevard du 30 Juin",
                    "overview_polyline": { "points": "_p~iF~ps|U_ulLnnqC" },
                    "legs": [{
                        "start_location": { "lat": -4.33012, "lng": 15.31021 },
                        "end_location": { "lat": -4.30121, "lng": 15.31254 },
                        "distance": { "text": "4,2 km", "value": 4200 },
                        "duration": { "text": "14 min", "value": 840 },
                        "steps": [{
                            "html_instructions": "Prendre la direction <b>nord</b>",
                            "distance": { "text": "0,4 km", "value": 400 },
                            "duration": { "text": "1 min", "value": 60 },
                            "start_location": { "lat": -4.33012, "lng": 15.31021 },
                            "end_location": { "lat": -4.3265, "lng": 15.3110 }
                        }]
                    }]
                }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/maps/api/directions/json"))
            .and(query_param("mode", "walking"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ZERO_RESULTS" })))
            .mount(&server)
            .await;

        let mut config = Config::new("render-key");
        config.endpoints = butterfly_viz::ApiEndpoints {
            directions_url: format!("{}/maps/api/directions/json", server.uri()),
            ..Default::default()
        };
        let composer = MapComposer::new(config).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("trajet.html");
        let target = file_path.to_string_lossy().into_owned();
        render_once(&composer, OutputDestination::File(target)).await.unwrap();

        let written = std::fs::read_to_string(&file_path).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
        assert!(written.contains("Trajets Voiture"));
        assert!(written.contains("staticmap?center="));
        assert!(written.contains("key=render-key"));
    }

    #[tokio::test]
    async fn test_render_once_reports_unwritable_path() {
        let server = wiremock::MockServer::start().await;
        let mut config = Config::new("render-key");
        config.endpoints = butterfly_viz::ApiEndpoints {
            directions_url: format!("{}/maps/api/directions/json", server.uri()),
            ..Default::default()
        };
        let composer = MapComposer::new(config).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing").join("trajet.html");
        let err = render_once(&composer, OutputDestination::File(target.to_string_lossy().into_owned()))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("write "));
    }

    #[test]
    fn test_apply_overrides_keeps_defaults() {
        let cli = Cli::try_parse_from(["butterfly-viz"]).unwrap();
        let mut config = Config::new("k");
        apply_overrides(&mut config, &cli);

        assert_eq!(config.trip, butterfly_viz::Trip::default());
        assert_eq!(config.step_filter, StepFilter::default());
    }
}
