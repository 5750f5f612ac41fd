//! Core of the Clippings PR-coverage dashboard: report data model, mock
//! generator, backend client, coverage selection, report assembly, and the
//! session state machine. Everything is held in memory for the lifetime of
//! a session; nothing is persisted.

pub mod assembly;
pub mod backend;
pub mod cli;
pub mod config;
pub mod mock;
pub mod model;
pub mod selection;
pub mod session;
