mod accounts;
mod init;
mod misc;
mod status;

pub use accounts::{handle_add, handle_list, handle_show};
pub use init::handle_init;
pub use misc::handle_completions;
pub use status::handle_status;
