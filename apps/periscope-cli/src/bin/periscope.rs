use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};

use periscope_cli::sources::{CatalogSource, DemoConfig, LatentSource};
use periscope_cli::terminal::TerminalSink;
use periscope_core::config::Config;
use periscope_core::types::SourceDescriptor;
use periscope_orchestrator::{Orchestrator, OrchestratorConfig};
use periscope_rank::{RankingConfig, RankingEngine, SharedRanker};

fn show_help() {
    println!("Type to search. Commands:");
    println!("  /pick N    - select result N (trains the ranker)");
    println!("  /hl N      - highlight result N");
    println!("  /enter     - select highlighted or first result");
    println!("  /voice T   - run T as a voice command (auto-executes the top result)");
    println!("  /auto      - toggle auto-execute for typed queries");
    println!("  /quit      - exit");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    periscope_cli::init_tracing();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let ranking: RankingConfig = config.get_or_default("ranking")?;
    let orchestration: OrchestratorConfig = config.get_or_default("orchestrator")?;
    let demo: DemoConfig = config.get_or_default("demo")?;

    let sources = vec![
        SourceDescriptor::Sync(Arc::new(CatalogSource::new("Websites", demo.websites).with_icon("link"))),
        SourceDescriptor::Async(Arc::new(LatentSource::new(
            CatalogSource::new("Encyclopedia", demo.articles).with_icon("book").with_command_prefix("wikipedia "),
            Duration::from_millis(demo.articles_delay_ms),
        ))),
    ];
    let ranker = SharedRanker::new(RankingEngine::new(&ranking)?);
    let sink = Arc::new(TerminalSink::new());
    let orchestrator = Orchestrator::new(sources, ranker, sink.clone(), orchestration)?;
    tracing::info!(capacity = ranking.capacity, sources = orchestrator.sources().len(), "periscope ready");

    show_help();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        let (command, arg) = input.split_once(' ').map_or((input, ""), |(c, a)| (c, a.trim()));
        match command {
            "" => continue,
            "/quit" | "/q" => break,
            "/help" | "/h" => show_help(),
            "/pick" => match arg.parse().ok().and_then(|n| sink.entry(n)) {
                Some(result) => orchestrator.on_select(&result),
                None => println!("no result {arg}"),
            },
            "/hl" => sink.set_highlight(arg.parse().ok()),
            "/enter" => {
                if orchestrator.on_enter_pressed().is_none() {
                    println!("nothing to select");
                }
            }
            "/voice" => {
                orchestrator.on_voice_input(arg);
                orchestrator.settled().await;
            }
            "/auto" => {
                let enabled = !orchestrator.auto_execute_first();
                orchestrator.set_auto_execute_first(enabled);
                println!("auto-execute {}", if enabled { "on" } else { "off" });
            }
            _ => orchestrator.on_input_changed(input),
        }
    }
    Ok(())
}
