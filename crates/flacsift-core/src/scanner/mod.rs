pub mod walk;

pub use walk::find_flac_files;
