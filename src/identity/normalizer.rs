use std::collections::{BTreeSet, HashMap};

use log::debug;

use crate::domain::{HistoryRecord, NormalizedRow, ResultRow};

use super::uid::{has_token, player_uid};

pub type UidMapping = HashMap<String, String>;

/// Assign each row its canonical player identifier.
///
/// Token-less UIDs of a name collapse onto the smallest token-bearing UID of
/// the same name. Token-bearing UIDs are never merged with each other.
pub fn normalize(rows: Vec<ResultRow>) -> Vec<NormalizedRow> {
    let uids: Vec<String> = rows
        .iter()
        .map(|row| player_uid(&row.name, row.token()))
        .collect();

    let mapping = build_uid_mapping(
        rows.iter()
            .map(|r| r.name.as_str())
            .zip(uids.iter().map(String::as_str)),
    );

    rows.into_iter()
        .zip(uids)
        .map(|(row, uid)| {
            let normalized_uid = resolve(&mapping, &uid);
            NormalizedRow {
                row,
                player_uid: uid,
                normalized_uid,
            }
        })
        .collect()
}

/// Re-resolve identities across a league's whole history
pub fn normalize_history(records: &mut [HistoryRecord]) {
    let uids: Vec<String> = records
        .iter()
        .map(|r| player_uid(&r.name, r.secondary_token.as_deref()))
        .collect();

    let mapping = build_uid_mapping(
        records
            .iter()
            .map(|r| r.name.as_str())
            .zip(uids.iter().map(String::as_str)),
    );

    for (record, uid) in records.iter_mut().zip(&uids) {
        record.normalized_uid = resolve(&mapping, uid);
    }
}

/// Build the token-less → token-bearing UID mapping from (name, uid) pairs
pub fn build_uid_mapping<'a, I>(pairs: I) -> UidMapping
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut name_to_uids: HashMap<&str, BTreeSet<&str>> = HashMap::new();
    for (name, uid) in pairs {
        name_to_uids.entry(name).or_default().insert(uid);
    }

    let mut mapping = UidMapping::new();
    for (name, uids) in name_to_uids {
        let (with_token, without_token): (Vec<&str>, Vec<&str>) =
            uids.into_iter().partition(|uid| has_token(uid));

        // BTreeSet iteration keeps the partitions sorted
        let Some(canonical) = with_token.first() else {
            continue;
        };

        for uid in without_token {
            debug!("Merging '{}' into '{}' for name '{}'", uid, canonical, name);
            mapping.insert(uid.to_string(), canonical.to_string());
        }
    }

    mapping
}

fn resolve(mapping: &UidMapping, uid: &str) -> String {
    mapping
        .get(uid)
        .cloned()
        .unwrap_or_else(|| uid.to_string())
}
