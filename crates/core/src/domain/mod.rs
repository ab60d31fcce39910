pub mod growth;
pub mod portfolio;
