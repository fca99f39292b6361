#[macro_export]
macro_rules! include_res {
    (bytes, $p:expr) => {
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
    (str, $p:expr) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
}

pub const USERS_SCHEMA: &str = include_res!(str, "/sql/users.sql");
pub const CHATS_SCHEMA: &str = include_res!(str, "/sql/chats.sql");
