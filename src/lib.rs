// src/lib.rs

//! jobscan: nursing job posting scanner library

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod services;
pub mod storage;
pub mod utils;
