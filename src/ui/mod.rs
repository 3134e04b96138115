//! UI components for Confpad

pub mod file_page;
pub mod file_tree;
pub mod settings;
pub mod tree_table;
