use std::path::PathBuf;

use anyhow::{Context as _, bail};
use chrono::Utc;
use rand::Rng as _;
use relicboard_engine::{Board, ItemCatalog, PlacedItem};
use relicboard_evaluator::ScoreEvaluator;
use relicboard_search::{DEFAULT_ITERATIONS, PlacementSearcher, SearchOutcome, SearchSeed};

use crate::{
    command::{CatalogArg, RulesArg},
    schema::{
        request::{ItemRequest, OptimizeRequest},
        result::OptimizeResult,
    },
    util::{self, Output},
};

const DEFAULT_WIDTH: usize = 5;
const DEFAULT_HEIGHT: usize = 5;
const CELL_WIDTH: usize = 23;
const COLUMN_WIDTH: usize = 25;
const EMPTY_CELL: &str = "---";

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct OptimizeArg {
    #[clap(flatten)]
    catalog: CatalogArg,
    #[clap(flatten)]
    rules: RulesArg,
    /// Request file: `{ "items": [...], "width": N, "height": N }`
    #[arg(long, conflicts_with = "items")]
    request: Option<PathBuf>,
    /// Item to place (repeatable)
    #[arg(long = "item", value_name = "ID[:PRIORITY[:UPGRADE]]")]
    items: Vec<ItemRequest>,
    /// Board width [default: request width, or 5]
    #[arg(long)]
    width: Option<usize>,
    /// Board height [default: request height, or 5]
    #[arg(long)]
    height: Option<usize>,
    /// Number of search iterations
    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    iterations: usize,
    /// Search seed (32 hex digits); random if omitted
    #[arg(long)]
    seed: Option<SearchSeed>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &OptimizeArg) -> anyhow::Result<()> {
    let OptimizeArg {
        catalog,
        rules,
        request,
        items,
        width,
        height,
        iterations,
        seed,
        output,
    } = arg;

    let catalog = catalog.load()?;

    let request = match request {
        Some(path) => util::read_json_file::<OptimizeRequest, _>("request", path)?,
        None => OptimizeRequest {
            items: Some(items.clone()),
            ..OptimizeRequest::default()
        },
    };
    let (items, width, height) = resolve_request(request, *width, *height)?;
    let seed = seed.unwrap_or_else(|| rand::rng().random());

    let item_names = items
        .iter()
        .map(|item| catalog.display_name(&item.id))
        .collect::<Vec<_>>();
    eprintln!("Optimizing placement of: {}", item_names.join(", "));
    eprintln!("Board: {width}x{height}, iterations: {iterations}, seed: {seed}");

    let evaluator = ScoreEvaluator::with_rules(&catalog, rules.to_score_rules());
    let searcher = PlacementSearcher::new(&catalog, &evaluator);
    let items = items.into_iter().map(PlacedItem::from).collect();
    let outcome =
        searcher.find_optimal_placement(items, width, height, *iterations, &mut seed.rng());

    eprintln!();
    eprint!("{}", format_report(&catalog, &outcome));

    let result = OptimizeResult {
        seed,
        optimized_at: Utc::now(),
        iterations: outcome.iterations,
        score: outcome.score,
        initial_score: outcome.initial_score,
        accepted_moves: outcome.accepted_moves,
        board: outcome.board,
    };
    Output::save_json(&result, output.clone())?;

    Ok(())
}

/// Applies command-line overrides and defaults to a request and validates it.
fn resolve_request(
    request: OptimizeRequest,
    width: Option<usize>,
    height: Option<usize>,
) -> anyhow::Result<(Vec<ItemRequest>, usize, usize)> {
    let items = request.items.unwrap_or_default();
    if items.is_empty() {
        bail!("No items to place; pass --item or --request");
    }
    for item in &items {
        item.validate()
            .with_context(|| format!("Invalid item: {}", item.id))?;
    }
    let width = width.or(request.width).unwrap_or(DEFAULT_WIDTH);
    let height = height.or(request.height).unwrap_or(DEFAULT_HEIGHT);
    Board::check_size(width, height).context("Invalid board size")?;
    Ok((items, width, height))
}

fn format_report(catalog: &ItemCatalog, outcome: &SearchOutcome) -> String {
    let separator = "-".repeat(outcome.board.width() * COLUMN_WIDTH);
    let mut report = format!("Best score: {:.2}\n{separator}\n", outcome.score);
    for row in outcome.board.rows() {
        let cells = row
            .iter()
            .map(|cell| format_cell(catalog, cell.as_ref()))
            .collect::<Vec<_>>();
        report.push_str(&cells.join(" "));
        report.push('\n');
    }
    report.push_str(&separator);
    report.push('\n');
    report
}

fn format_cell(catalog: &ItemCatalog, cell: Option<&PlacedItem>) -> String {
    let Some(item) = cell else {
        return format!("{EMPTY_CELL:<CELL_WIDTH$}");
    };
    let id = item.item_id();
    let mut details = Vec::new();
    if catalog.is_rotatable_slate(id) {
        details.push(item.rotation().to_string());
    }
    if catalog.artifact(id).is_some() && item.upgrade_level() > 0 {
        details.push(format!("+{}", item.upgrade_level()));
    }
    let label = if details.is_empty() {
        catalog.display_name(id).to_owned()
    } else {
        format!("{} ({})", catalog.display_name(id), details.join(", "))
    };
    format!("{label:<CELL_WIDTH$}")
}
