pub mod file;
pub mod memory;
pub mod preferences;

use anyhow::Result;

/// Key under which the serialized preference object is stored.
pub const PREFERENCES_KEY: &str = "gtb_user_data";

/// Key under which the last logged-in email is stored. Written, never read for gating.
pub const USER_KEY: &str = "gtb_user";

/// String-valued key/value storage, the shape of browser local storage.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
}
