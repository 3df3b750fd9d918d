mod config;
mod task;

pub use config::handle_config_command;
pub use task::{create_task_demo, get_task_status, sign_url};
