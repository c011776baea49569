use std::path::PathBuf;

use clap::{Parser, Subcommand};
use relicboard_engine::ItemCatalog;
use relicboard_evaluator::{
    ScoreRules,
    score_evaluator::{DEFAULT_GRIMOIRE_TAG, DEFAULT_PLANET_TAG, DEFAULT_TELESCOPE_ID},
};

use crate::util;

use self::{optimize::OptimizeArg, score::ScoreArg, serve::ServeArg};

mod optimize;
mod score;
mod serve;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Search for a high-scoring placement of items
    Optimize(#[clap(flatten)] OptimizeArg),
    /// Score a saved board and explain each cell
    Score(#[clap(flatten)] ScoreArg),
    /// Serve the optimizer over HTTP
    Serve(#[clap(flatten)] ServeArg),
}

/// Where item definitions are read from.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct CatalogArg {
    /// Artifact definitions (JSON array)
    #[arg(long, default_value = "artifacts.json")]
    artifacts: PathBuf,
    /// Slate definitions (JSON array)
    #[arg(long, default_value = "slates.json")]
    slates: PathBuf,
}

impl CatalogArg {
    pub(crate) fn load(&self) -> anyhow::Result<ItemCatalog> {
        util::read_catalog(&self.artifacts, &self.slates)
    }
}

/// Ids and tags used by the built-in scoring rules.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RulesArg {
    /// Tag an artifact needs to satisfy `requires_grimoire_right` on its left neighbor
    #[arg(long, default_value = DEFAULT_GRIMOIRE_TAG)]
    grimoire_tag: String,
    /// Item id that earns a bonus for every neighboring planet
    #[arg(long, default_value = DEFAULT_TELESCOPE_ID)]
    telescope_id: String,
    /// Tag counted by the telescope bonus
    #[arg(long, default_value = DEFAULT_PLANET_TAG)]
    planet_tag: String,
}

impl RulesArg {
    pub(crate) fn to_score_rules(&self) -> ScoreRules {
        ScoreRules {
            grimoire_tag: self.grimoire_tag.clone(),
            telescope_id: self.telescope_id.clone(),
            planet_tag: self.planet_tag.clone(),
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Optimize(arg) => optimize::run(&arg)?,
        Mode::Score(arg) => score::run(&arg)?,
        Mode::Serve(arg) => serve::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_rule_defaults() {
        let args = CommandArgs::try_parse_from(["relicboard", "score", "--board", "b.json"]).unwrap();
        let Mode::Score(arg) = args.mode else {
            panic!("expected score mode");
        };
        assert_eq!(arg.rules.to_score_rules(), ScoreRules::default());
        assert_eq!(arg.catalog.artifacts, PathBuf::from("artifacts.json"));
    }
}
