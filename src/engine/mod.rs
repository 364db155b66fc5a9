pub mod assert;
pub mod batch;
pub mod compare;
pub mod script;
