pub mod buckets;
pub mod categories;
pub mod common;
pub mod month;
pub mod patterns;
pub mod report;
pub mod summary;
pub mod top;
pub mod validate;
