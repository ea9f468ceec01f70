pub mod archive;
pub mod commands;
pub mod download;
pub mod github;
pub mod http;
pub mod menu;
pub mod project;
pub mod release;
pub mod runtime;
