pub mod protocol;
pub mod reset_task;
pub mod rest;
pub mod state;
pub mod ws_handler;

// Re-export the handlers the binary mounts on the router.
pub use rest::{availability_handler, list_practitioners_handler, list_slots_handler};
pub use ws_handler::ws_handler;
