use clap::Parser;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use stdpar::{
    adjacent_find, count, fallback, find_end, find_first_of, route_with, search, search_n, Config, Forward,
    HostView, Ledger, OffloadError, ParUnseq, Route,
};

/// Run the search family over a file on the device and on the host fallback
/// and report whether the two paths agree.
#[derive(Parser)]
struct Args {
    /// Input file to search
    input: PathBuf,
    /// Pattern bytes, hex encoded
    #[arg(long)]
    pattern: String,
    /// Run length for search_n, using the first pattern byte
    #[arg(long, default_value_t = 2)]
    run: usize,
    /// JSON configuration file; STDPAR_* variables override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write the report here instead of stdout
    #[arg(long)]
    json: Option<PathBuf>,
}

#[derive(Serialize)]
struct Outcome {
    algorithm: &'static str,
    offload: usize,
    fallback: usize,
    agree: bool,
}

#[derive(Serialize)]
struct Report {
    input_len: usize,
    pattern_len: usize,
    contiguous_route: Route,
    forward_route: Route,
    outcomes: Vec<Outcome>,
    ledger: Ledger,
}

fn outcome(algorithm: &'static str, offload: usize, fallback: usize) -> Outcome {
    Outcome {
        algorithm,
        offload,
        fallback,
        agree: offload == fallback,
    }
}

fn main() {
    env_logger::init();
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    }
}

fn run() -> Result<bool, Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let config = config.with_overrides(|key| std::env::var(key).ok())?;
    let policy = ParUnseq::with_config(config);

    let data = fs::read(&args.input).map_err(OffloadError::from)?;
    let pattern = hex::decode(args.pattern.trim())?;
    let value = pattern.first().copied().unwrap_or(0);

    let host = HostView::Slice(&data);
    let pat = HostView::Slice(&pattern);
    let eq = |a: &u8, b: &u8| a == b;

    let outcomes = vec![
        outcome(
            "search",
            search(&policy, &data, &pattern),
            fallback::search(&host, &pat, &eq),
        ),
        outcome(
            "find_end",
            find_end(&policy, &data, &pattern),
            fallback::find_end(&host, &pat, &eq),
        ),
        outcome(
            "find_first_of",
            find_first_of(&policy, &data, &pattern),
            fallback::find_first_of(&host, &pat, &eq),
        ),
        outcome(
            "adjacent_find",
            adjacent_find(&policy, &data),
            fallback::adjacent_find(&host, &eq),
        ),
        outcome(
            "search_n",
            search_n(&policy, &data, args.run, &value),
            fallback::search_n(&host, args.run, &value, &eq),
        ),
        outcome(
            "count",
            count(&policy, &data, &value),
            fallback::count_if(&host, &|x: &u8| *x == value),
        ),
    ];
    let agree = outcomes.iter().all(|o| o.agree);

    let report = Report {
        input_len: data.len(),
        pattern_len: pattern.len(),
        contiguous_route: route_with::<&Vec<u8>, fn(&u8) -> bool>(),
        forward_route: route_with::<Forward<'_, std::slice::Iter<'_, u8>>, fn(&u8) -> bool>(),
        outcomes,
        ledger: policy.device().ledger(),
    };
    let text = serde_json::to_string_pretty(&report)?;
    match &args.json {
        Some(path) => fs::write(path, text).map_err(OffloadError::from)?,
        None => println!("{text}"),
    }
    Ok(agree)
}
