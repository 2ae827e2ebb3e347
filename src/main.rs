use anyhow::Context;
use casebase::{load_cases, load_records, Case, CaseBase, CaseEngine, KnnClassifier, WeightMap};
use casebase_similarity::{ExplainedNeighbor, Neighbor, NeighborhoodResponse, Prediction, PredictionReport};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Case-based reasoning over tabular records
#[derive(Parser, Debug)]
#[command(name = "casebase")]
#[command(about = "Retrieve, predict and recommend from similar past cases", long_about = None)]
struct Args {
    /// JSON array of cases
    #[arg(long, conflicts_with = "records", required_unless_present = "records")]
    cases: Option<PathBuf>,

    /// JSON array of raw movie rows, converted to feature-vector cases
    #[arg(long)]
    records: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Which case of the base to use as the query
#[derive(clap::Args, Debug)]
#[group(required = true, multiple = false)]
struct QuerySelector {
    /// First case whose title contains this text (case-insensitive)
    #[arg(long)]
    title: Option<String>,

    /// Position of the case in the input
    #[arg(long)]
    index: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Most similar cases by weighted attribute similarity
    Retrieve {
        #[command(flatten)]
        query: QuerySelector,

        /// Number of neighbors
        #[arg(long, default_value_t = 5)]
        k: usize,

        /// Attribute to predict from the neighbors
        #[arg(long)]
        predict: Option<String>,

        /// Weight overrides, e.g. "IMDB_Rating=2;Genre=1.5"
        #[arg(long)]
        weights: Option<String>,
    },
    /// Similar cases with distinct titles
    Recommend {
        #[command(flatten)]
        query: QuerySelector,

        #[arg(long, default_value_t = 3)]
        top_k: usize,

        /// Weight overrides, e.g. "IMDB_Rating=2;Genre=1.5"
        #[arg(long)]
        weights: Option<String>,
    },
    /// Label vote by Euclidean distance over feature vectors
    Classify {
        #[command(flatten)]
        query: QuerySelector,

        #[arg(long, default_value_t = 1)]
        k: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting casebase v{}", env!("CARGO_PKG_VERSION"));

    let cases = match (&args.cases, &args.records) {
        (Some(path), _) => load_cases(path).with_context(|| format!("failed to load cases from {}", path.display()))?,
        (None, Some(path)) => {
            load_records(path).with_context(|| format!("failed to load records from {}", path.display()))?
        }
        (None, None) => anyhow::bail!("either --cases or --records is required"),
    };
    info!("Loaded {} cases", cases.len());

    match args.command {
        Command::Retrieve { query, k, predict, weights } => {
            let engine = build_engine(cases, weights.as_deref())?;
            retrieve(&engine, &query, k, predict.as_deref(), args.json)
        }
        Command::Recommend { query, top_k, weights } => {
            let engine = build_engine(cases, weights.as_deref())?;
            recommend(&engine, &query, top_k, args.json)
        }
        Command::Classify { query, k } => classify(cases, &query, k, args.json),
    }
}

fn build_engine(cases: Vec<Case>, weights: Option<&str>) -> anyhow::Result<CaseEngine> {
    let base = CaseBase::build(cases).context("failed to build case base")?;
    info!("Case base ready: {} cases, {} attributes", base.len(), base.schema().len());
    let weights = weights.map(WeightMap::parse).unwrap_or_default();
    Ok(CaseEngine::new(Arc::new(base), weights))
}

fn select<'a>(base: &'a CaseBase, selector: &QuerySelector) -> anyhow::Result<&'a Case> {
    let case = match (&selector.title, selector.index) {
        (Some(title), _) => base.find_by_display_key(title)?,
        (None, Some(index)) => base.get(index)?,
        (None, None) => anyhow::bail!("either --title or --index is required"),
    };
    Ok(case)
}

fn retrieve(
    engine: &CaseEngine,
    selector: &QuerySelector,
    k: usize,
    target: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let base = engine.base();
    let query = select(base, selector)?;

    let (neighbors, prediction) = match target {
        Some(target) => {
            if base.kind_of(target).is_none() {
                tracing::warn!(attribute = target, "attribute not in the case base schema");
            }
            let (neighbors, prediction) = engine.retrieve_and_predict(query, k, target)?;
            (neighbors, Some(prediction))
        }
        None => (engine.retrieve_neighbors(query, k, None)?, None),
    };

    if json {
        let explained = engine.explain(query, &neighbors, target);
        let mut response = NeighborhoodResponse::new(query.display_key.clone(), explained, base.len().saturating_sub(1));
        if let Some(prediction) = &prediction {
            response = response.with_prediction(prediction);
        }
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("Query: {}", base.display_key_of(query));
    println!("Top {} similar cases:", neighbors.len());
    print_similarities(base, &neighbors);

    if let (Some(target), Some(prediction)) = (target, &prediction) {
        print_prediction(target, query, prediction);
    }
    Ok(())
}

fn recommend(engine: &CaseEngine, selector: &QuerySelector, top_k: usize, json: bool) -> anyhow::Result<()> {
    let base = engine.base();
    let target = select(base, selector)?;
    let results = engine.recommend_similar(target, top_k)?;

    if json {
        let explained = engine.explain(target, &results, None);
        let response = NeighborhoodResponse::new(target.display_key.clone(), explained, base.len().saturating_sub(1));
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("Because you liked: {}", base.display_key_of(target));
    if results.is_empty() {
        println!("No recommendations found.");
    }
    print_similarities(base, &results);
    Ok(())
}

fn classify(cases: Vec<Case>, selector: &QuerySelector, k: usize, json: bool) -> anyhow::Result<()> {
    let mut knn = KnnClassifier::new(k)?;
    knn.fit(cases).context("no case carries a feature vector")?;
    let base = Arc::clone(knn.base().context("classifier has no case base")?);
    info!("Classifier fitted: k = {}, {} cases", knn.k(), base.len());

    let query = select(&base, selector)?;
    let neighbors = knn.nearest_neighbors(query, k)?;
    let label = casebase_similarity::vote(&neighbors)?;

    if json {
        let response = NeighborhoodResponse::new(
            query.display_key.clone(),
            ExplainedNeighbor::from_neighbors(&neighbors),
            base.len().saturating_sub(1),
        );
        let output = serde_json::json!({
            "predicted_label": label,
            "actual_label": query.label,
            "neighbors": response,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Query: {}", base.display_key_of(query));
    for (pos, neighbor) in neighbors.iter().enumerate() {
        println!(
            "{:>2}. dist={:.3} | {} [{}]",
            pos + 1,
            neighbor.score,
            base.display_key_of(neighbor.case),
            neighbor.case.label.as_deref().unwrap_or(casebase_similarity::UNLABELED),
        );
    }
    println!(
        "Predicted label: {} (actual: {})",
        label,
        query.label.as_deref().unwrap_or(casebase_similarity::UNLABELED)
    );
    Ok(())
}

fn print_similarities(base: &CaseBase, neighbors: &[Neighbor<'_>]) {
    for (pos, neighbor) in neighbors.iter().enumerate() {
        println!("{:>2}. sim={:.1}% | {}", pos + 1, neighbor.score * 100.0, base.display_key_of(neighbor.case));
    }
}

fn print_prediction(target: &str, query: &Case, prediction: &Prediction) {
    let actual = query
        .attribute(target)
        .map(ToString::to_string)
        .unwrap_or_else(|| "n/a".to_string());

    match PredictionReport::from(prediction) {
        PredictionReport::Numeric { value } => {
            println!("Predicted {}: {:.2} (actual: {})", target, value, actual);
        }
        PredictionReport::Categorical { label, distribution } => {
            println!("Predicted {}: {} (actual: {})", target, label, actual);
            for share in distribution {
                println!("    {:<20} {:>5.1}%", share.value, share.percent);
            }
        }
        PredictionReport::None => {
            println!("No neighbor has a value for {}", target);
        }
    }
}
