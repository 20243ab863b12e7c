//! End-to-end workflows run by the CLI.

mod collections;
mod full_index;

pub use collections::{
    run_collection_tasks, CollectionReport, CollectionTasks, FacetReport, SearchReport,
};
pub use full_index::{run_full_index, FullIndexOptions, FullIndexReport};

#[cfg(test)]
pub(crate) mod test_support;
