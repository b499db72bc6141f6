use anyhow::{bail, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use book_graph_analyzer::client::HttpBackend;
use book_graph_analyzer::error::FlowKind;
use book_graph_analyzer::flow::Completion;
use book_graph_analyzer::presenter::{node_label, GraphPresenter, JsonGraphPresenter, SentimentClass};
use book_graph_analyzer::session::AnalysisSession;

#[derive(Parser, Debug)]
#[command(name = "analyze_book")]
#[command(about = "Descarga un libro de Gutenberg vía el servidor y muestra personajes y citas")]
struct Cli {
    /// Id del libro en Project Gutenberg (p. ej. 1342).
    #[arg(long)]
    id: String,
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    server: String,
    /// Pide también las citas con sentimiento.
    #[arg(long, default_value_t = false)]
    quotes: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let session = AnalysisSession::new(HttpBackend::new(cli.server));

    session.fetch_book(&cli.id).await;
    check(&session, FlowKind::Book)?;

    if session.analyze_characters().await == Completion::Applied {
        check(&session, FlowKind::Characters)?;
    }
    if let Some(analysis) = session.character_analysis() {
        let view = JsonGraphPresenter.present(&analysis.value, &node_label);
        println!("{}", serde_json::to_string_pretty(&view)?);
    }

    if cli.quotes {
        session.analyze_quotes().await;
        if let Some((_, notice)) = session.acknowledge(FlowKind::Quotes) {
            println!("{notice}");
        }
        for quote in session.quotes() {
            println!(
                "“{}”\n  {} → {} | {} ({:?})",
                quote.quote,
                quote.speaker,
                quote.target,
                quote.sentiment,
                SentimentClass::classify(&quote.sentiment)
            );
        }
    }

    Ok(())
}

fn check<B>(session: &AnalysisSession<B>, kind: FlowKind) -> Result<()>
where
    B: book_graph_analyzer::client::AnalysisBackend,
{
    if let Some((err, notice)) = session.acknowledge(kind) {
        bail!("{notice} ({err})");
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
