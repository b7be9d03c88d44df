//! Layout manifests describing each museum variant.
//!
//! A layout names the scene file, the camera setup and the tables that map
//! mesh names to interactive roles (doors, trigger volumes, exhibits).

/// Serde model of the `*.layout.json` asset plus content validation.
pub mod museum_layout;
