pub mod time_utils;
pub mod image_utils;
