pub mod bitmap;
pub mod clouds;
pub mod lightning;
pub mod particles;
pub mod scene;
pub mod surface;
