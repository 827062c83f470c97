// src/lib.rs

//! gradelink: profile enumeration and hashed-grade linking

pub mod error;
pub mod hashing;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
