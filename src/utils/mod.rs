pub mod format;
pub mod sanitize;
pub mod words;
