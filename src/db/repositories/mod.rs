pub mod activity_repository;
pub mod employee_repository;
pub mod evaluation_repository;
pub mod settings_repository;
