use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use filesift::{MatchKind, SearchController, SearchEvent, SearchOutcome, SearchRequest};

/// Recursively searches a directory for files whose name or content contains
/// a keyword, streaming matches as they are found. Ctrl-C cancels the search
/// and still reports the matches found so far.
#[derive(Parser, Debug)]
#[command(name = "filesift", version, about)]
struct Args {
    /// Root directory to search
    root: PathBuf,

    /// Keyword to look for in filenames and file content (case-sensitive)
    keyword: String,

    /// Emit matches as JSON lines instead of tab-separated text
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let mut controller = SearchController::new();
    // Surrounding whitespace is almost never intended; an all-blank keyword
    // then fails validation as empty.
    let request = SearchRequest::new(&args.root, args.keyword.trim());
    let mut stream = controller.start(request)?;

    let mut total: usize = 0;
    let outcome = loop {
        tokio::select! {
            event = stream.recv() => match event {
                Some(SearchEvent::Match(result)) => {
                    total += 1;
                    if args.json {
                        println!("{}", serde_json::to_string(&result)?);
                    } else {
                        let kind = match result.kind {
                            MatchKind::Name => "name",
                            MatchKind::Content => "content",
                        };
                        println!("{kind}\t{}", result.path.display());
                    }
                }
                Some(SearchEvent::Finished(outcome)) => break outcome,
                None => anyhow::bail!("result stream closed without a terminal event"),
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupt received, cancelling search");
                controller.cancel();
            }
        }
    };

    match outcome {
        SearchOutcome::Completed => eprintln!("Search completed: {total} match(es)."),
        SearchOutcome::Cancelled => {
            eprintln!("Search cancelled: {total} match(es) before cancellation.")
        }
    }

    Ok(())
}
