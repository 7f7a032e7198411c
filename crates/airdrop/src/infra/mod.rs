pub mod blockchain;
pub mod cli;
pub mod config;
pub mod notify;
pub mod persistence;

pub use {
    blockchain::Ethereum,
    config::Config,
    notify::Console,
    persistence::{FileStore, MemoryStore},
};
