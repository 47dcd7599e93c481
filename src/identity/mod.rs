pub mod normalizer;
pub mod uid;

pub use normalizer::{build_uid_mapping, normalize, normalize_history, UidMapping};
pub use uid::{has_token, player_uid, UID_SEPARATOR};
