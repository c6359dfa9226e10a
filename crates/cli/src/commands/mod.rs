pub mod config_cmd;
pub mod embed;
pub mod generate;
pub mod models;
