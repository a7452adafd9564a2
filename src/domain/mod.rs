//! Pure domain records (formulas, users, favorites, result history).
//! No I/O, no CLI, no storage.

pub mod common;
pub mod formula;
pub mod history;
pub mod user;

pub use common::*;
pub use formula::{default_catalog, Formula, FormulaBuilder};
pub use history::{CalculationAttributes, ResultHistory};
pub use user::{FavoritesList, Role, SiteUser, SiteUserSummary};
