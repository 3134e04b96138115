//! Confpad core: configuration documents and their tree projection

pub mod core;
pub mod tree;
