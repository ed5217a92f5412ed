pub mod export;
pub mod review;
