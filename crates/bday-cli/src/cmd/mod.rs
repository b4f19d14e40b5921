pub mod add;
pub mod completions;
pub mod list;
pub mod next;
pub mod status;
pub mod upcoming;
