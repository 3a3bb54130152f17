use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use docquiz::application::services::{AnalysisService, FlashcardGenerator, QuestionGenerator};
use docquiz::infrastructure::llm::ModelFactory;
use docquiz::infrastructure::observability::{TracingConfig, init_tracing};
use docquiz::infrastructure::text_processing::CompositeFileLoader;
use docquiz::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(&TracingConfig::from_settings(environment, &settings.logging));

    let models = ModelFactory::create(&settings.models);
    if settings.models.preload {
        models.preload().await.context("Failed to preload models")?;
    }

    let question_generator = QuestionGenerator::new(
        models.question_generator(),
        settings.generation.questions.generator_config(),
    );
    let flashcard_generator = FlashcardGenerator::new(
        models.flashcard_generator(),
        models.embedder(),
        settings.generation.flashcards.generator_config(),
    );

    let analysis_service = Arc::new(AnalysisService::new(
        Arc::new(CompositeFileLoader::with_default_adapters()),
        question_generator,
        flashcard_generator,
    ));

    let router = create_router(
        AppState::new(analysis_service),
        settings.server.max_upload_bytes(),
    );

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
