pub mod ops_plan;
pub mod ops_tree;
