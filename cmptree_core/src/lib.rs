pub mod compare;
pub mod comparison;
pub mod merge;
pub mod partition;
pub mod report;
pub mod scanner;

pub use compare::PathComparator;
pub use comparison::{check_root, ComparisonEngine};
pub use merge::merge_path_sets;
pub use partition::partition;
pub use report::{Reporter, Totals};
pub use scanner::TreeScanner;
