pub mod advisory;
pub mod catalog;
pub mod comments;
pub mod llm;
pub mod providers;
pub mod reviews;
pub mod threads;
pub mod verdict;

pub use advisory::classify;
pub use threads::build_threads;
