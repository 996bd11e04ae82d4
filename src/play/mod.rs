// src/play/mod.rs

pub mod engine;
pub mod service;

pub use engine::{Advance, Checked, advance, answers_match, check, normalize_answer};
pub use service::RandomPlay;
