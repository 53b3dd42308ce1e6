//! Installed app bookkeeping
//!
//! Apps are identified on chain by the namehash of their repository name.
//! The delegable apps are published on the open registry, everything else
//! on the main one.

use std::collections::BTreeMap;

use lib_abi::{app_id, Address, DecodedEvent, Token, H256};

/// App repository names and whether they live on the open registry
pub const KNOWN_APPS: &[(&str, bool)] = &[
    ("agent", false),
    ("vault", false),
    ("voting", false),
    ("survey", false),
    ("payroll", false),
    ("finance", false),
    ("token-manager", false),
    ("delegable-voting", true),
    ("delegable-token-manager", true),
];

pub fn known_app_ids() -> Vec<(&'static str, H256)> {
    KNOWN_APPS
        .iter()
        .map(|(name, open)| (*name, app_id(name, *open)))
        .collect()
}

/// Repository name of a known app id
pub fn app_name(id: &H256) -> Option<&'static str> {
    KNOWN_APPS
        .iter()
        .find(|(name, open)| app_id(name, *open) == *id)
        .map(|(name, _)| *name)
}

/// Group decoded `NewAppProxy` events by app.
///
/// Known ids are keyed by repository name, unknown ones by their hex id.
/// Proxies keep event order. Events without `proxy`/`appId` are skipped.
pub fn group_installed_apps(events: &[DecodedEvent]) -> BTreeMap<String, Vec<Address>> {
    let mut apps: BTreeMap<String, Vec<Address>> = BTreeMap::new();
    for event in events {
        let proxy = event.arg("proxy").and_then(Token::as_address);
        let id = event
            .arg("appId")
            .and_then(Token::as_fixed_bytes)
            .and_then(|b| H256::from_slice(b).ok());
        if let (Some(proxy), Some(id)) = (proxy, id) {
            let key = app_name(&id)
                .map(str::to_string)
                .unwrap_or_else(|| id.to_string());
            apps.entry(key).or_default().push(proxy);
        }
    }
    apps
}
