//! JSON-RPC 2.0 communication layer for host page integration.
//!
//! Implements bidirectional messaging between the walkthrough and the page
//! embedding it via iframe postMessage, supporting both request-response and
//! notification patterns.
//!
//! ## Message Flow
//!
//! ```text
//! Host page (Parent Window)  <──postMessage──>  Bevy (iframe)
//!        │                                        │
//!        ├─ Request (with ID) ──────────────────> │
//!        │                                        ├─ Process request
//!        │ <───────────────── Response (with ID) ─┤
//!        │                                        │
//!        │ <────────── Notification (no ID) ─────┤
//! ```
//!
//! ## Error Handling
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32601`: Method not found
//! - `-32602`: Invalid params (missing field, unknown door or exhibit)
//! - `-32603`: Internal error (scene not ready yet)
//!
//! ## Methods
//!
//! ### Diagnostics
//! - `get_fps`: Retrieve current frame rate
//!
//! ### Doors
//! - `get_doors`: List every door id with its opened flag
//! - `toggle_door`: Toggle a door by id (`{"door": "fox_door"}`), same as clicking it
//!
//! ### Exhibits
//! - `show_exhibit`: Show an exhibit's info (`{"mesh": "Fox_Exhibit"}`)
//! - `close_info`: Hide the info modal
//!
//! ## Notifications
//! - `scene_ready` `{variant}` once the scene is configured
//! - `scene_failed` `{reason}` when setup stops
//! - `door_toggled` `{door, opened}`
//! - `exhibit_selected` `{mesh, title}`
//! - `fps_update` `{fps}` every half second

/// JSON-RPC 2.0 bidirectional communication system for host page integration.
///
/// Handles request-response patterns, notifications, and WASM message listeners.
pub mod web_rpc;
