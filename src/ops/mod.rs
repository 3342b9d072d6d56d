pub mod agenda;
pub mod query;
