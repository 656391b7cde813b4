//! Model routing.

pub mod table;
