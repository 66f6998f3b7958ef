pub mod catalog;
pub mod compiler;
pub mod resolver;
pub mod source;
