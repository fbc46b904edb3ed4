pub mod document;
pub mod settings;
pub mod study;
pub mod wizard;
