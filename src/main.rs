use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use textlayer_search::dom::parser::parse_html;
use textlayer_search::highlight::HighlightSession;
use textlayer_search::locate::locate_and_highlight;
use textlayer_search::net::fetch::HttpSearchBackend;
use textlayer_search::viewer::{SnapshotViewer, Viewer};
use textlayer_search::{SearchConfig, SearchSession};

/// Find backend search hits inside a rendered PDF text layer.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// HTML snapshot of the rendered viewer (pages with `data-page-number`
    /// containers and `.textLayer` fragments)
    #[arg(long)]
    html: PathBuf,

    /// Highlight window in chars from the match start
    #[arg(long, default_value_t = textlayer_search::config::DEFAULT_WINDOW_CHARS)]
    window: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Locate a phrase on one page and list the fragments it marks
    Locate {
        #[arg(long)]
        page: u32,
        #[arg(long)]
        phrase: String,
    },
    /// Query the backend and highlight its matches in the snapshot
    Search {
        #[arg(long)]
        query: String,
        /// Restrict the search to one document
        #[arg(long)]
        id: Option<String>,
        #[arg(long, default_value = textlayer_search::config::DEFAULT_ENDPOINT)]
        endpoint: String,
        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
        /// Step through this many further matches after the first
        #[arg(long, default_value_t = 0)]
        next: usize,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let html = match std::fs::read_to_string(&cli.html) {
        Ok(html) => html,
        Err(e) => {
            eprintln!("Cannot read {}: {}", cli.html.display(), e);
            return ExitCode::FAILURE;
        }
    };
    let doc = parse_html(&html);
    let mut viewer = SnapshotViewer::new(doc);

    match cli.command {
        Command::Locate { page, phrase } => {
            let mut session = HighlightSession::new();
            match locate_and_highlight(&mut viewer, &mut session, page, &phrase, cli.window) {
                Some(first) => {
                    viewer.scroll_into_view(&first);
                    print_marked(&viewer, session.marked());
                }
                None => println!("No match for {:?} on page {}", phrase, page),
            }
        }
        Command::Search {
            query,
            id,
            endpoint,
            timeout,
            next,
        } => {
            let mut config = SearchConfig::default()
                .with_endpoint(endpoint)
                .with_window_chars(cli.window);
            if let Some(secs) = timeout {
                config = config.with_timeout(Duration::from_secs(secs));
            }
            let backend = match HttpSearchBackend::new(&config) {
                Ok(backend) => backend,
                Err(e) => {
                    eprintln!("{}", e);
                    return ExitCode::FAILURE;
                }
            };

            let mut session = SearchSession::new(config, Arc::new(backend), |current, total| {
                println!("Match {} of {}", current, total);
            });
            match id {
                Some(id) => session.search_in(&query, &id),
                None => session.search(&query),
            }
            session.settle(&mut viewer);
            print_marked(&viewer, session.highlighted());

            for _ in 0..next {
                session.next(&mut viewer, std::time::Instant::now());
                session.settle(&mut viewer);
                print_marked(&viewer, session.highlighted());
            }
        }
    }

    ExitCode::SUCCESS
}

fn print_marked(viewer: &SnapshotViewer, marked: &[textlayer_search::dom::NodePath]) {
    if marked.is_empty() {
        println!("  (nothing highlighted)");
        return;
    }
    for path in marked {
        let text = viewer
            .document()
            .get(path)
            .map(|n| n.text_content())
            .unwrap_or_default();
        println!("  {} {:?}", path, text);
    }
}
