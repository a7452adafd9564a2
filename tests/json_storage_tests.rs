mod common;

use std::fs;

use common::{setup_test_env, temp_base};
use converter_core::{
    core::errors::ConverterError,
    domain::{CalculationAttributes, ResultHistory, SiteUser},
    storage::{FormulaCatalog, JsonStorage, ResultHistoryStore, UserStore},
};

#[test]
fn user_documents_are_plain_json_named_after_the_username() {
    let env = setup_test_env();
    let user = SiteUser::new("frank_06", "frank@example.com").unwrap();
    env.storage.put_user(&user).unwrap();

    let path = env.storage.user_path("frank_06").expect("safe key");
    let json = fs::read_to_string(&path).unwrap();
    assert!(json.contains("\"frank@example.com\""));
    assert!(json.contains("\"favorites\""));
}

#[test]
fn writes_leave_no_temporary_files_behind() {
    let env = setup_test_env();
    let user = SiteUser::new("grace_07", "grace@example.com").unwrap();
    env.storage.put_user(&user).unwrap();
    env.storage.put_user(&user).unwrap();

    let users_dir = env.storage.root().join("users");
    let leftovers: Vec<_> = fs::read_dir(users_dir)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().and_then(|ext| ext.to_str()) != Some("json"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn unreadable_documents_are_skipped_when_listing() {
    let env = setup_test_env();
    let user = SiteUser::new("heidi_08", "heidi@example.com").unwrap();
    env.storage.put_user(&user).unwrap();
    fs::write(env.storage.root().join("users").join("broken.json"), "{ not json").unwrap();

    let users = env.storage.list_users().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].username(), "heidi_08");
}

#[test]
fn unsafe_keys_are_never_found_and_cannot_be_written() {
    let env = setup_test_env();
    assert!(env.storage.get_user("../escape").unwrap().is_none());
    assert!(env.storage.find_formula("a/b").unwrap().is_none());
    assert!(matches!(
        env.storage.resolve("../areaCircle"),
        Err(ConverterError::FormulaNotFound(_))
    ));
}

#[test]
fn import_reads_an_array_of_formula_records() {
    let base = temp_base();
    let storage = JsonStorage::new(base.join("data")).unwrap();
    let file = base.join("formulas.json");
    fs::write(
        &file,
        r#"[{"formulaName":"litersToGallons","formulaUrl":"/litersToGallons","category":"Volume","displayName":"Liters to Gallons"}]"#,
    )
    .unwrap();

    assert_eq!(storage.import_formulas(&file).unwrap(), 1);
    let formula = storage.resolve("litersToGallons").unwrap();
    assert_eq!(formula.category(), "Volume");
}

#[test]
fn history_entries_round_trip_and_delete_per_user() {
    let env = setup_test_env();
    let mut attrs = CalculationAttributes::new();
    attrs.insert("radius".into(), 2.into());
    let first = ResultHistory::new("ivan_009", attrs.clone()).with_title("circle");
    let second = ResultHistory::new("ivan_009", attrs.clone());
    let other = ResultHistory::new("judy_010", attrs);
    for entry in [&first, &second, &other] {
        env.storage.put_result(entry).unwrap();
    }

    let loaded = env.storage.get_result(&first.id).unwrap().expect("stored");
    assert_eq!(loaded.title.as_deref(), Some("circle"));
    assert_eq!(env.storage.results_for_user("ivan_009").unwrap().len(), 2);

    assert_eq!(env.storage.delete_results_for_user("ivan_009").unwrap(), 2);
    assert_eq!(env.storage.all_results().unwrap().len(), 1);
}

#[test]
fn deleting_a_formula_keeps_favorites_that_hold_it() {
    let env = setup_test_env();
    env.users
        .register("kevin_11", "kevin@example.com")
        .expect("register");
    env.favorites.add_favorite("kevin_11", "areaCircle").unwrap();

    assert!(env.storage.delete_formula("areaCircle").unwrap());
    assert!(!env.storage.delete_formula("areaCircle").unwrap());

    assert!(env.storage.find_formula("areaCircle").unwrap().is_none());
    let user = env.storage.get_user("kevin_11").unwrap().expect("stored");
    assert_eq!(user.favorites().ids(), vec!["areaCircle"]);
    let again = env.favorites.add_favorite("kevin_11", "areaCircle").unwrap();
    assert_eq!(again, user);
}
