pub mod category;
pub mod employee;
pub mod evaluation;
pub mod report;
pub mod settings;
