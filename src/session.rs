//! Keys under which request state lives in the server-side session.

pub const USER_ID: &str = "user_id";
pub const FLASH: &str = "flash";
