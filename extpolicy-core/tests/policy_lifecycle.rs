//! Install/remove lifecycle against a file-backed store

use std::collections::HashMap;

use extpolicy_core::{
    ActionError, ActionResult, ExtensionSettingsActions, ExtensionState, FileStore,
    PolicyLocation, PolicyMerger, PolicyStore, StoreError, StoreValue, URL_PARAM, UUID_PARAM,
    merger,
};
use serde_json::{Value, json};
use tempfile::TempDir;

const PATH: [&str; 4] = ["Software", "Policies", "Mozilla", "Firefox"];

fn params(id: &str, url: Option<&str>) -> HashMap<String, String> {
    let mut params = HashMap::from([(UUID_PARAM.to_string(), id.to_string())]);
    if let Some(url) = url {
        params.insert(URL_PARAM.to_string(), url.to_string());
    }
    params
}

fn read_policy(store: &FileStore) -> Value {
    let handle = store.open_existing(&PATH).unwrap().unwrap();
    let text = store
        .get(&handle, "ExtensionSettings")
        .unwrap()
        .and_then(|v| v.to_text())
        .unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn install_then_remove_keeps_unrelated_entries() {
    let start = json!({"A": {"installation_mode": "normal_installed", "install_url": "https://old"}});
    let after_install = merger::install(Some(start.to_string().as_str()), "B", "https://new").unwrap();
    assert_eq!(
        serde_json::from_str::<Value>(&after_install).unwrap(),
        json!({
            "A": {"installation_mode": "normal_installed", "install_url": "https://old"},
            "B": {"installation_mode": "normal_installed", "install_url": "https://new"}
        })
    );

    let after_remove = merger::remove(Some(after_install.as_str()), "A").unwrap().unwrap();
    assert_eq!(
        serde_json::from_str::<Value>(&after_remove).unwrap(),
        json!({
            "A": {"installation_mode": "blocked"},
            "B": {"installation_mode": "normal_installed", "install_url": "https://new"}
        })
    );
}

#[test]
fn actions_round_trip_through_file_store() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileStore::new(temp_dir.path());
    let actions =
        ExtensionSettingsActions::new(&store, PolicyLocation::default(), PolicyMerger::default());

    actions.install(&params("A", Some("https://old"))).unwrap();
    actions.install(&params("B", Some("https://new"))).unwrap();
    actions.remove(&params("A", None)).unwrap();

    assert_eq!(
        read_policy(&store),
        json!({
            "A": {"installation_mode": "blocked"},
            "B": {"installation_mode": "normal_installed", "install_url": "https://new"}
        })
    );
    assert_eq!(actions.state("A").unwrap(), ExtensionState::Blocked);
    assert_eq!(
        actions.state("B").unwrap(),
        ExtensionState::Installed {
            url: Some("https://new".into())
        }
    );

    // Reinstalling a blocked extension brings it back
    actions.install(&params("A", Some("https://again"))).unwrap();
    assert_eq!(
        read_policy(&store)["A"],
        json!({"installation_mode": "normal_installed", "install_url": "https://again"})
    );
}

#[test]
fn policy_is_stored_one_line_per_element() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileStore::new(temp_dir.path());
    let actions =
        ExtensionSettingsActions::new(&store, PolicyLocation::default(), PolicyMerger::default());

    actions.install(&params("X", Some("https://u"))).unwrap();

    let handle = store.open_existing(&PATH).unwrap().unwrap();
    let Some(StoreValue::MultiString(lines)) = store.get(&handle, "ExtensionSettings").unwrap()
    else {
        panic!("expected a multi-string value");
    };
    assert_eq!(lines.first().map(String::as_str), Some("{"));
    assert_eq!(lines.last().map(String::as_str), Some("}"));
    assert!(lines.iter().all(|line| !line.contains('\n')));
}

#[test]
fn remove_recovers_hand_edited_corrupt_value() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileStore::new(temp_dir.path());
    let handle = store.open_or_create(&PATH).unwrap();
    store
        .set(
            &handle,
            "ExtensionSettings",
            StoreValue::String("{ broken".into()),
        )
        .unwrap();

    let actions =
        ExtensionSettingsActions::new(&store, PolicyLocation::default(), PolicyMerger::default());
    actions.remove(&params("X", None)).unwrap();

    assert_eq!(
        read_policy(&store),
        json!({"X": {"installation_mode": "blocked"}})
    );
}

#[test]
fn custom_location_is_respected() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileStore::new(temp_dir.path());
    let location = PolicyLocation {
        vendor_root: "Vendor/Policies".into(),
        product: "Browser".into(),
        value_name: "Extensions".into(),
    };
    let actions = ExtensionSettingsActions::new(&store, location, PolicyMerger::default());

    actions.install(&params("X", Some("https://u"))).unwrap();

    assert!(temp_dir.path().join("Vendor/Policies/Browser/values.json").is_file());
}

#[test]
fn unreadable_store_document_fails_without_writing() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileStore::new(temp_dir.path());
    let handle = store.open_or_create(&PATH).unwrap();
    let values_file = handle.join("values.json");
    std::fs::write(&values_file, "{ not a values document").unwrap();

    let actions =
        ExtensionSettingsActions::new(&store, PolicyLocation::default(), PolicyMerger::default());

    let installed = actions.install(&params("X", Some("https://u")));
    assert!(matches!(
        installed,
        Err(ActionError::Store(StoreError::Corrupt { .. }))
    ));
    assert_eq!(ActionResult::from(&installed), ActionResult::Failure);

    let removed = actions.remove(&params("X", None));
    assert!(matches!(
        removed,
        Err(ActionError::Store(StoreError::Corrupt { .. }))
    ));

    assert_eq!(
        std::fs::read_to_string(&values_file).unwrap(),
        "{ not a values document"
    );
}
