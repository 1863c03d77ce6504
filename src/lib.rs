//! Caprender - Captioned Video Render Pipeline Driver
//!
//! Drives an existing Remotion captioning project: find the input video,
//! normalize its name, transcribe it with an external speech-to-text tool,
//! wait for a human transcript review, point the composition source at the
//! video and template, render, and rename the result.

pub mod assets;
pub mod cli;
pub mod composition;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod review;
pub mod tool;
pub mod transcribe;
