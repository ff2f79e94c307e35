pub mod analyze;
pub mod competitors;
