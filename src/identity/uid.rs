use crate::domain::present;

pub const UID_SEPARATOR: &str = "__";

/// `name__token` when a non-blank token is present, otherwise the bare name
pub fn player_uid(name: &str, token: Option<&str>) -> String {
    match present(token) {
        Some(token) => format!("{}{}{}", name, UID_SEPARATOR, token),
        None => name.to_string(),
    }
}

pub fn has_token(uid: &str) -> bool {
    uid.contains(UID_SEPARATOR)
}
