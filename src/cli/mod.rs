//! CLI command handlers

pub mod commands;

pub use commands::{csv, export, fsr, ifr, import, isr, load, sample, save};
