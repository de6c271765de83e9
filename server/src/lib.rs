//! The BSDP (Apple NetBoot) server implementation.

mod builder;
mod catalog;
mod engine;
mod error;
mod server;
mod settings;
mod storage;
mod storage_ram;

#[macro_use]
extern crate log;

pub use self::{
    builder::MessageBuilder,
    catalog::{Arch, BootImage, ImageCatalog, TransportType},
    engine::{ClientClass, ResponseEngine},
    error::Error,
    server::{Server, ServerHandle},
    settings::ServerConfig,
    storage::SelectionStore,
    storage_ram::RamSelectionStore,
};
