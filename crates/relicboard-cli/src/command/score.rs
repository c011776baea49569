use std::path::PathBuf;

use relicboard_engine::{Board, ItemCatalog};
use relicboard_evaluator::{ScoreEvaluator, score_evaluator::CellScore};

use crate::{
    command::{CatalogArg, RulesArg},
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ScoreArg {
    #[clap(flatten)]
    pub(super) catalog: CatalogArg,
    #[clap(flatten)]
    pub(super) rules: RulesArg,
    /// Board file: `{ "width": N, "height": N, "rows": [...] }`
    #[arg(long)]
    board: PathBuf,
    /// Output file path for the JSON breakdown
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ScoreArg) -> anyhow::Result<()> {
    let ScoreArg {
        catalog,
        rules,
        board,
        output,
    } = arg;

    let catalog = catalog.load()?;
    let board: Board = util::read_json_file("board", board)?;

    let evaluator = ScoreEvaluator::with_rules(&catalog, rules.to_score_rules());
    let breakdown = evaluator.explain(&board);

    eprintln!("Score: {:.2}", breakdown.total);
    if breakdown.slate_penalties > 0.0 {
        eprintln!("Slate penalties: -{:.2}", breakdown.slate_penalties);
    }
    for cell in &breakdown.cells {
        eprintln!("{}", format_cell_score(&catalog, cell));
    }

    Output::save_json(&breakdown, output.clone())?;
    Ok(())
}

fn format_cell_score(catalog: &ItemCatalog, cell: &CellScore) -> String {
    let CellScore {
        position,
        item_id,
        level,
        bonus,
        violated,
        contribution,
    } = cell;
    let mut line = format!(
        "({}, {}) {:<23} level {level:>6}",
        position.x,
        position.y,
        catalog.display_name(item_id)
    );
    if *bonus != 0 {
        line.push_str(&format!(" (bonus {bonus:+})"));
    }
    if *violated {
        line.push_str(" [condition violated]");
    }
    line.push_str(&format!(" -> {contribution:.2}"));
    line
}
