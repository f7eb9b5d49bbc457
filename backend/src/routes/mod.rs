pub mod doctors;
pub mod options;
pub mod schedule;
