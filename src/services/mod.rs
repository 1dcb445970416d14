pub mod calculations;
pub mod employee_service;
pub mod evaluation_store;
pub mod export_service;
pub mod report_fallbacks;
pub mod report_service;
pub mod settings_service;
pub mod trend;
