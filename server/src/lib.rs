pub mod command_handler;
pub mod connection;
pub mod connection_registry;
pub mod lifecycle;
pub mod relay;
pub mod room;
pub mod room_store;
pub mod ws_handler;
