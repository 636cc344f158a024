pub mod audit;
pub mod cr;
pub mod dispatch;
pub mod fields;
pub mod shared;
pub mod snapshot;
