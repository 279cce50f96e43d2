//! Herald Application Library
//!
//! This library provides the application modules for the Herald greeting
//! service.

pub mod modules;
