//! Rule categories

pub mod dependencies;
pub mod docs;
pub mod files;
pub mod manifests;
pub mod workflows;
