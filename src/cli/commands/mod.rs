mod auth;
mod list;
mod mutate;
mod show;

pub use auth::{cmd_login, cmd_logout, cmd_whoami};
pub use list::cmd_list;
pub use mutate::{cmd_add, cmd_edit, cmd_remove};
pub use show::cmd_show;
