pub mod payload;
pub mod protocol;

pub const DEFAULT_PORT: u16 = 8080;

pub type RoomID = String;
