//! `mailpost` — conditional mail-notification dispatcher.
//!
//! Given an optional file path, the pipeline decides whether to forward
//! it as an email attachment (name filters, size limit, delayed dispatch,
//! optional side copy) and hands exactly one message to the SMTP
//! transport before exiting.

pub mod config;
pub mod copier;
pub mod dispatch;
pub mod error;
pub mod filter;
pub mod gate;
pub mod message;
pub mod template;
pub mod transport;
