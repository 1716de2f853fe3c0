use anyhow::{Context, Result};
use chrono::Utc;
use cheatsheets::components::layout::Styles;
use cheatsheets::pages::sheet::{self, SheetPage};
use cheatsheets::{
    AppState, CollectionId, Command, Config, GithubClient, MarkdownRenderer, SheetService,
    run_http_server, stylesheet,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    // Load .env if present, but do not fail if file does not exist.
    let _ = dotenvy::dotenv();

    let config = Config::parse();
    config.validate().context("Invalid configuration")?;

    let client = GithubClient::new(config.github_settings()?)?;
    let service = SheetService::new(client, config.cache());
    let renderer = MarkdownRenderer::with_highlighter(config.highlighter());
    let origin = config.share_origin()?;

    match &config.command {
        Command::Serve { bind } => {
            let state = AppState {
                sheets: service,
                renderer: Arc::new(renderer),
                origin,
            };
            run_http_server(state, bind).await?;
        }
        Command::Render {
            collection,
            active,
            output,
        } => {
            let collection = CollectionId::parse(collection)?;
            let issues = service.issues(&collection).await;
            let css = stylesheet();
            let page = SheetPage {
                collection: &collection,
                issues: &issues,
                active: active.as_deref(),
                origin: &origin,
                styles: Styles::Inline(&css),
                now: Utc::now(),
            };
            let html = sheet::generate(&page, &renderer);
            sheet::write(output, &html)?;
            info!(
                collection = %collection,
                entries = issues.len(),
                output = %output.display(),
                "rendered cheatsheet"
            );
        }
    }

    Ok(())
}

fn init_tracing() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cheatsheets=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))
}
