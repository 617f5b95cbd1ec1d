pub mod consts;
pub mod coreg;
pub mod error;
pub mod io;
pub mod metadata;
pub mod raster;
pub mod stack;
