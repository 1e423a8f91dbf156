pub mod navigation_service;

pub use navigation_service::NavigationService;
