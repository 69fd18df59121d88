// Techlearn API Server - content API for the technology-learning platform

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use techlearn::{app_state::AppState, config::Config, create_content_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("techlearn=info,tower_http=info")),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize application state
    let app_state = AppState::new(config.clone()).await?;

    let app = create_content_router(app_state);

    let addr = config.server_address();
    info!("Techlearn API starting on http://{}", addr);
    info!("  GET          /technologies/, /tutorials/, /topics/, /blogs/, /snippets/");
    info!("  GET          /{{kind}}/{{slug}}/");
    info!("  POST         /{{kind}}/            (staff token)");
    info!("  PUT|PATCH|DELETE /{{kind}}/{{slug}}/ (staff token)");
    info!("  GET          /questions/, /answers/");
    info!("  GET          /tags/, /tags/{{tag_slug}}/{{kind}}/");
    info!("  GET          {}*", config.media.url_path);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
