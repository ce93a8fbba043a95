pub mod atmosphere;
pub mod color;
pub mod location;
pub mod solar;
pub mod weather;
