pub mod json_cache_store;

pub use json_cache_store::JsonFileCacheStore;
