//! Command implementations.

pub mod batch;
pub mod demo;
pub mod ingest;
pub mod list;
pub mod logs;
pub mod stats;

pub use self::batch::execute_batch;
pub use self::demo::execute_demo;
pub use self::ingest::execute_ingest;
pub use self::list::execute_list;
pub use self::logs::execute_logs;
pub use self::stats::execute_stats;
