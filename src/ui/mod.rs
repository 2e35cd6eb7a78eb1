pub mod prompts;

pub use prompts::{SelectError, select_from_list, select_from_list_with, wait_for_enter};
