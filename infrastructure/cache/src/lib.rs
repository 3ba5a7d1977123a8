pub mod local_cache;
pub mod redis_cache;
