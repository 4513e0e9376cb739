pub mod encoding;
pub mod model;
