pub mod acc;
pub mod fs;
pub mod sm;
pub mod time;

mod internal;
