pub mod add;
pub mod auth_cmd;
pub mod common;
pub mod config;
pub mod delete;
pub mod edit;
pub mod flags;
pub mod list;
pub mod regenerate;
pub mod show;
pub mod tags;
