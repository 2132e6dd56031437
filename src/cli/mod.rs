//! CLI module for the Sales Report API
//!
//! - `serve`: run the HTTP API
//! - `hash-password`: print a password hash for seeding the directory

pub mod hash_password;
pub mod serve;

use clap::{Parser, Subcommand};

/// Sales Report API - daily visit reporting backend
#[derive(Parser)]
#[command(name = "sales-report-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve,

    /// Hash a password for the salesperson.password_hash column
    HashPassword(hash_password::HashPasswordArgs),
}
