pub mod encoding;
pub mod loader;
