pub mod format;

pub use format::{format_date, format_doses};
