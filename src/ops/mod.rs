pub mod engine;
pub mod mutation;
pub mod stats;
pub mod task_ops;
pub mod view;
