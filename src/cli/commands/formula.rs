use std::path::Path;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::domain::{default_catalog, Formula};

use super::{required, split_action};

const ACTIONS: &[&str] = &["list", "categories", "show", "import", "seed", "delete"];
const USAGE: &str = "formula <list|categories|show|import|seed|delete>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "formula",
        "Browse and maintain the formula catalog",
        USAGE,
        cmd_formula,
    )
    .with_actions(ACTIONS)]
}

fn cmd_formula(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = split_action(args, USAGE)?;
    match action.as_str() {
        "list" => {
            let formulas = context.formulas.all()?;
            output::section("Formulas");
            for formula in &formulas {
                output::line(describe(formula));
            }
            Ok(())
        }
        "categories" => {
            for (category, members) in context.formulas.by_category()? {
                output::section(category);
                for formula in &members {
                    output::line(describe(formula));
                }
            }
            Ok(())
        }
        "show" => {
            let name = required(rest, 0, "formula show <name>")?;
            let formula = context.formulas.get(name)?;
            output::section(formula.display_name());
            output::line(format!("name: {}", formula.formula_name()));
            output::line(format!("category: {}", formula.category()));
            output::line(format!("url: {}", formula.formula_url()));
            Ok(())
        }
        "import" => {
            let path = required(rest, 0, "formula import <path.json>")?;
            let count = context.storage.import_formulas(Path::new(path))?;
            output::success(format!("Imported {count} formulas."));
            Ok(())
        }
        "seed" => {
            let count = context.storage.seed_formulas(default_catalog())?;
            output::success(format!("Seeded {count} built-in formulas."));
            Ok(())
        }
        "delete" => {
            let name = required(rest, 0, "formula delete <name>")?;
            if !context.confirm(&format!(
                "Remove `{name}` from the catalog? Existing favorites keep their copy."
            ))? {
                output::info("Formula kept.");
                return Ok(());
            }
            if context.storage.delete_formula(name)? {
                output::success(format!("Formula `{name}` removed from the catalog."));
            } else {
                output::info(format!("Formula `{name}` was not in the catalog."));
            }
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown formula subcommand `{}`",
            other
        ))),
    }
}

pub(crate) fn describe(formula: &Formula) -> String {
    format!(
        "{:<22} {} ({})",
        formula.formula_name(),
        formula.display_name(),
        formula.category()
    )
}
