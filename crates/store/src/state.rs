//! State slices and the reducer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::action::Action;

/// Last scanned cartridge code. A new scan overwrites, never appends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanState {
    pub cartridge_scan: Option<String>,
}

/// Remote endpoints, edited by the settings screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsState {
    pub cartridge_server_url: String,
    pub docs_server_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryState {
    pub date: Option<DateTime<Utc>>,
}

/// Whole state tree. Cloned out of the store on every snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub scan: ScanState,
    pub settings: SettingsState,
    pub inventory: InventoryState,
}

impl State {
    pub fn with_settings(settings: SettingsState) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }
}

/// Pure, total transition function.
///
/// Every action is accepted in every state; unknown or redundant values simply
/// produce an equal state.
pub fn reduce(state: &State, action: &Action) -> State {
    let mut next = state.clone();
    match action {
        Action::SetCartridgeScan(code) => {
            next.scan.cartridge_scan = code.clone();
        }
        Action::SetCartridgeServerUrl(url) => {
            next.settings.cartridge_server_url = url.clone();
        }
        Action::SetDocsServerUrl(url) => {
            next.settings.docs_server_url = url.clone();
        }
        Action::SetInventoryDate(date) => {
            next.inventory.date = *date;
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn new_scan_overwrites_previous() {
        let state = reduce(
            &State::default(),
            &Action::SetCartridgeScan(Some("CRT-001".to_string())),
        );
        let state = reduce(&state, &Action::SetCartridgeScan(Some("CRT-002".to_string())));
        assert_eq!(state.scan.cartridge_scan.as_deref(), Some("CRT-002"));
    }

    #[test]
    fn settings_change_leaves_scan_untouched() {
        let state = reduce(
            &State::default(),
            &Action::SetCartridgeScan(Some("CRT-001".to_string())),
        );
        let state = reduce(
            &state,
            &Action::SetCartridgeServerUrl("http://10.0.0.2:4000/graphql".to_string()),
        );
        assert_eq!(state.scan.cartridge_scan.as_deref(), Some("CRT-001"));
        assert_eq!(state.settings.cartridge_server_url, "http://10.0.0.2:4000/graphql");
    }

    #[test]
    fn inventory_date_can_be_set_and_cleared() {
        let date = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
        let state = reduce(&State::default(), &Action::SetInventoryDate(Some(date)));
        assert_eq!(state.inventory.date, Some(date));
        let state = reduce(&state, &Action::SetInventoryDate(None));
        assert_eq!(state.inventory.date, None);
    }

    fn any_action() -> impl Strategy<Value = Action> {
        prop_oneof![
            proptest::option::of("[A-Z]{3}-[0-9]{3}").prop_map(Action::SetCartridgeScan),
            "http://[a-z]{1,8}".prop_map(Action::SetCartridgeServerUrl),
            "http://[a-z]{1,8}".prop_map(Action::SetDocsServerUrl),
            proptest::option::of(0i64..4_000_000_000)
                .prop_map(|secs| Action::SetInventoryDate(
                    secs.and_then(|s| Utc.timestamp_opt(s, 0).single())
                )),
        ]
    }

    proptest! {
        /// Property: reducing the same action twice is the same as reducing it once.
        #[test]
        fn reducer_is_idempotent(actions in prop::collection::vec(any_action(), 1..20)) {
            let mut state = State::default();
            for action in &actions {
                let once = reduce(&state, action);
                let twice = reduce(&once, action);
                prop_assert_eq!(&once, &twice);
                state = once;
            }
        }
    }
}
