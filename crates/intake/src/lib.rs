//! # OpsDesk Intake
//!
//! Turns a block of pasted client details into a `DailyAddedClient`.

mod client_parser;

pub use client_parser::{parse_client_details, ClientField, ParseError, ParsedClientDetails};
