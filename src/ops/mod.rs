pub mod export;
pub mod rasterize;
