//! Phrasebook - merged phrase tables and template translation
//!
//! ## Architecture
//!
//! - `i18n` - Phrase store, template engine and translator
//! - `loader` - Package phrase-file discovery and ingestion
//! - `service` - The loaded store shared by every request
//! - `server` - Per-language JSON endpoint and request translation middleware
//! - `config` - Environment configuration

pub mod config;
pub mod i18n;
pub mod loader;
pub mod server;
pub mod service;
