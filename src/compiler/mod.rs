pub mod oxc;
