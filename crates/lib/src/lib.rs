//! commentbot core library — config, completion client, LinkedIn channel, and the
//! webhook server used by the CLI.

pub mod channels;
pub mod config;
pub mod llm;
pub mod webhook;
