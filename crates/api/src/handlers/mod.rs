pub mod category;
pub mod transfer;
pub mod video;
