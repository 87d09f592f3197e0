pub mod build;
pub mod highlight;
