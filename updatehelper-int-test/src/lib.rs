pub mod line_file;
pub mod test_util;
