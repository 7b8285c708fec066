mod local;

pub use local::{read_archive, replace_atomically, sibling_with_suffix, write_file};
