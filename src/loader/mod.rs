//! Card-definition lookup consumed by the rules core

pub mod database;

pub use database::CardDatabase;
