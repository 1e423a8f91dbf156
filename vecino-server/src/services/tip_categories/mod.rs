pub mod tip_categories_hooks;
pub mod tip_categories_service;
pub mod tip_categories_shared;

pub use tip_categories_service::TipCategoriesService;
