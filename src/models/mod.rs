// src/models/mod.rs

pub mod play;
pub mod quiz;
