//! Service layer for fixcam-dx
//!
//! The diagnosis pipeline proper: media normalization, prompt rendering,
//! provider clients, record extraction, project assembly, and the
//! on-demand step-illustration generator.

pub mod asset_generator;
pub mod diagnosis;
pub mod gemini_client;
pub mod imagen_client;
pub mod media_normalizer;
pub mod project_assembler;
pub mod prompt_builder;
pub mod response_extractor;
