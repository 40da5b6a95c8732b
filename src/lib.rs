//! igor-bot - A Slack slash command bot with localized, pluggable commands

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod plugins;
