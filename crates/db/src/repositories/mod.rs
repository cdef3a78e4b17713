//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod category_repo;
pub mod history_repo;
pub mod video_repo;

pub use category_repo::CategoryRepo;
pub use history_repo::HistoryRepo;
pub use video_repo::VideoRepo;
