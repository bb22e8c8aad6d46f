pub mod cache;
pub mod dns;
pub mod output;
pub mod sources;
