//! Utility modules for common functionality
//!
//! This module provides various utility functions and types used throughout the application.

pub mod logger;
pub mod progress;
pub mod mask_utils;
pub mod arg_utils;
