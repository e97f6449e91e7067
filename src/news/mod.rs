pub mod audit;
pub mod catalog;
pub mod config;
pub mod feed;
pub mod merge;
pub mod paths;
pub mod pipeline;
pub mod reconcile;
pub mod record;
pub mod registry;
pub mod selector;
pub mod summary;
pub mod tabular;
pub mod util;
pub mod warn;
