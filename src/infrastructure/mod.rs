pub mod channels;
pub mod observability;
pub mod persistence;
pub mod storage;
