pub mod favorites_reconciler;
pub mod favorites_service;
pub mod formula_service;
pub mod history_service;
pub mod user_service;

pub use favorites_reconciler::{FavoritesChange, FavoritesReconciler};
pub use favorites_service::FavoritesService;
pub use formula_service::FormulaService;
pub use history_service::ResultHistoryService;
pub use user_service::UserService;

pub type ServiceResult<T> = crate::core::errors::Result<T>;
