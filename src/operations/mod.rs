pub mod classify;
pub mod creation;
pub mod modification;
pub mod query;
