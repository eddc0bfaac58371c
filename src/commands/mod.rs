pub mod list;
pub mod process;
