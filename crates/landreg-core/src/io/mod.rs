pub mod image_io;
pub mod world_file;
