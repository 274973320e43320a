use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use docseek_core::duplicates::remove_duplicates;
use docseek_core::paginator::paginate;
use docseek_core::request_queue::RequestQueue;
use docseek_core::{
    DocId, DocumentStatus, ExecutionPolicy, ScoredDocument, SearchConfig, SearchEngine, StopWords,
};
use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct InputDoc {
    id: DocId,
    text: String,
    #[serde(default)]
    status: DocumentStatus,
    #[serde(default)]
    ratings: Vec<i32>,
}

#[derive(Parser)]
#[command(name = "docseek")]
#[command(about = "Query an in-memory TF-IDF index built from JSON/JSONL documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct IndexArgs {
    /// Input path (file or directory of .json/.jsonl files)
    #[arg(long)]
    input: String,
    /// Space-separated stop words
    #[arg(long, default_value = "")]
    stop_words: String,
    /// Use the built-in English stop-word list instead of --stop-words
    #[arg(long, default_value_t = false)]
    english_stop_words: bool,
    /// Maximum documents returned per query
    #[arg(long, default_value_t = docseek_core::MAX_RESULT_DOCUMENT_COUNT)]
    max_results: usize,
    /// Shards of the parallel relevance accumulator
    #[arg(long, default_value_t = 100)]
    shard_count: usize,
}

#[derive(Args, Debug, Clone)]
struct SearchOptions {
    /// Query text; repeat for several queries
    #[arg(long = "query", required = true)]
    queries: Vec<String>,
    /// Only documents with this status (actual, irrelevant, banned, removed)
    #[arg(long, default_value = "actual")]
    status: DocumentStatus,
    /// Score each query's terms on the thread pool
    #[arg(long, default_value_t = false)]
    parallel: bool,
    /// Run all queries concurrently against actual documents
    #[arg(long, default_value_t = false, conflicts_with_all = ["status", "parallel"])]
    batch: bool,
    /// Split each result list into pages of this size (0 = no paging)
    #[arg(long, default_value_t = 0)]
    page_size: usize,
    /// Print JSON lines instead of text
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one or more queries and print the top documents
    Search {
        #[command(flatten)]
        index: IndexArgs,
        #[command(flatten)]
        options: SearchOptions,
    },
    /// Show which query words every document matches
    Match {
        #[command(flatten)]
        index: IndexArgs,
        #[arg(long)]
        query: String,
    },
    /// Remove documents with identical word sets and list what remains
    Dedup {
        #[command(flatten)]
        index: IndexArgs,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { index, options } => {
            let engine = load_engine(&index)?;
            print!("{}", search(&engine, &options)?);
            Ok(())
        }
        Commands::Match { index, query } => {
            let engine = load_engine(&index)?;
            for line in match_all(&engine, &query)? {
                println!("{line}");
            }
            Ok(())
        }
        Commands::Dedup { index } => {
            let mut engine = load_engine(&index)?;
            for id in remove_duplicates(&mut engine) {
                println!("Found duplicate document id {id}");
            }
            let remaining: Vec<String> = engine.iter().map(|id| id.to_string()).collect();
            println!("remaining: {}", remaining.join(" "));
            Ok(())
        }
    }
}

fn load_engine(args: &IndexArgs) -> Result<SearchEngine> {
    let stop_words = if args.english_stop_words {
        StopWords::english()
    } else {
        StopWords::from_text(&args.stop_words).context("invalid stop words")?
    };
    let config = SearchConfig { shard_count: args.shard_count, max_results: args.max_results };
    let mut engine = SearchEngine::with_config(stop_words, config);

    for file in input_files(Path::new(&args.input)) {
        let docs = if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            read_jsonl(&file)?
        } else {
            read_json(&file)?
        };
        for doc in docs {
            engine
                .add_document(doc.id, &doc.text, doc.status, &doc.ratings)
                .with_context(|| format!("cannot add document {} from {}", doc.id, file.display()))?;
        }
    }

    tracing::info!(num_docs = engine.document_count(), num_terms = engine.term_count(), "loaded documents");
    Ok(engine)
}

fn input_files(input_path: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input_path.is_dir() {
        for entry in WalkDir::new(input_path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
    } else if input_path.is_file() {
        files.push(input_path.to_path_buf());
    }
    files
}

fn read_jsonl(file: &Path) -> Result<Vec<InputDoc>> {
    let f = File::open(file).with_context(|| format!("cannot open {}", file.display()))?;
    let reader = BufReader::new(f);
    let mut docs = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let doc: InputDoc = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: malformed document", file.display(), lineno + 1))?;
        docs.push(doc);
    }
    Ok(docs)
}

fn read_json(file: &Path) -> Result<Vec<InputDoc>> {
    let f = File::open(file).with_context(|| format!("cannot open {}", file.display()))?;
    let reader = BufReader::new(f);
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    let docs = match json {
        serde_json::Value::Array(arr) => arr
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<InputDoc>, _>>()?,
        serde_json::Value::Object(_) => vec![serde_json::from_value(json)?],
        _ => {
            tracing::warn!(file = %file.display(), "skipping file without documents");
            Vec::new()
        }
    };
    Ok(docs)
}

fn search(engine: &SearchEngine, options: &SearchOptions) -> Result<String> {
    let mut requests = RequestQueue::new(engine);
    let results = if options.batch {
        requests.add_find_requests(&options.queries).context("batch query failed")?
    } else {
        let policy = if options.parallel {
            ExecutionPolicy::Parallel
        } else {
            ExecutionPolicy::Sequential
        };
        let status = options.status;
        let mut results = Vec::with_capacity(options.queries.len());
        for query in &options.queries {
            let found = requests
                .add_find_request_policy(policy, query, move |_, document_status, _| {
                    document_status == status
                })
                .with_context(|| format!("query '{query}' failed"))?;
            results.push(found);
        }
        results
    };
    tracing::info!(
        empty = requests.no_result_requests(),
        total = options.queries.len(),
        "queries finished"
    );

    let mut out = String::new();
    for (query, found) in options.queries.iter().zip(&results) {
        out.push_str(&render_results(query, found, options.page_size, options.json)?);
    }
    Ok(out)
}

fn render_results(query: &str, found: &[ScoredDocument], page_size: usize, json: bool) -> Result<String> {
    if json {
        let line = serde_json::json!({ "query": query, "results": found });
        return Ok(format!("{}\n", serde_json::to_string(&line)?));
    }

    let mut out = format!("Results for request: {query}\n");
    if page_size == 0 {
        for doc in found {
            out.push_str(&format!("{doc}\n"));
        }
        return Ok(out);
    }
    for page in &paginate(found, page_size) {
        for doc in page.iter() {
            out.push_str(&format!("{doc}\n"));
        }
        out.push_str("Page break\n");
    }
    Ok(out)
}

fn match_all(engine: &SearchEngine, query: &str) -> Result<Vec<String>> {
    let mut lines = Vec::with_capacity(engine.document_count());
    for id in engine {
        let (words, status) = engine.match_document(query, id)?;
        lines.push(format!(
            "{{ document_id = {id}, status = {status}, words = {} }}",
            words.join(" ")
        ));
    }
    Ok(lines)
}
