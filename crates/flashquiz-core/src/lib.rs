//! flashquiz-core — question parsing, the JSON question database, and quiz
//! sessions.
//!
//! The two halves only meet through the database file: [`parser`] turns text
//! question banks into a [`db::QuestionDb`], and [`session`] / [`runner`]
//! quiz a user on a loaded database.

pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod parser;
pub mod runner;
pub mod session;
