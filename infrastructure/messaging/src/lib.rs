pub mod options;
pub mod postgres_queue;
pub mod status;
