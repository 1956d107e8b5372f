// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Procedural 3D structure viewer built on wgpu.
//!
//! Helico renders either a synthetic DNA double helix or a layered
//! organoid into a host surface, and owns every GPU resource it creates
//! from mount to unmount.
//!
//! # Key entry points
//!
//! - [`engine::HelicoEngine`] - the mount handle a host drives
//! - [`viewport::ViewportContext`] - camera, controller and render backend
//! - [`scene::ContentManager`] - swaps structures in and out of a
//!   [`scene::Scene`]
//! - [`render_loop::RenderLoop`] - continuous frames through a host
//!   [`render_loop::FrameScheduler`]
//! - [`structure`] - pure builders producing [`structure::ContentNode`]s
//! - [`options::Options`] - runtime configuration with TOML presets
//!
//! # Architecture
//!
//! Everything runs on the host's thread. The host calls
//! [`engine::HelicoEngine::on_frame`] for each scheduled frame; structure
//! switches dispose the old nodes' GPU handles through the
//! [`gpu::resources::ResourceAllocator`] before building new ones.
//! Rendering goes through the [`gpu::backend::RenderBackend`] trait, with
//! [`gpu::wgpu_backend::WgpuBackend`] as the production implementation.

pub mod camera;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod input;
pub mod options;
pub mod render_loop;
pub mod scene;
pub mod structure;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;
pub mod viewport;

pub use engine::HelicoEngine;
pub use error::HelicoError;
pub use input::{InputEvent, KeyAction, MouseButton};
pub use options::Options;
pub use structure::{StructureParams, StructureType};
#[cfg(feature = "viewer")]
pub use viewer::{Viewer, ViewerBuilder};
pub use viewport::{SurfaceSize, ViewportContext};
