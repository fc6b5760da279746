//! Device model consumed by simulated network equipment CLIs.
//!
//! A box carries its identity (vendor, model, version), login credentials,
//! physical ports, VLANs and routing entries. Menus read it through ordered
//! iteration and field lookups and change it through a handful of mutation
//! calls.

pub mod box_model;
pub mod model_error;
pub mod model_root;

pub use box_model::*;
pub use model_error::ModelError;
pub use model_root::ModelRoot;
