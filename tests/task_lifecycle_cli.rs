mod support;

use predicates::str::contains;
use serde_json::Value;

use support::TestData;

#[test]
fn add_toggle_remove_scenario() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::init()?;

    let created = data.json(&["add", "A", "--priority", "high"]);
    assert_eq!(created["command"].as_str(), Some("add"));
    assert_eq!(created["status"].as_str(), Some("success"));
    let id = created["data"]["task"]["id"].as_str().expect("id").to_string();
    assert_eq!(created["data"]["task"]["priority"].as_str(), Some("high"));
    assert_eq!(created["data"]["task"]["completed"].as_bool(), Some(false));

    let listed = data.json(&["list"]);
    assert_eq!(listed["data"]["total"].as_u64(), Some(1));

    let toggled = data.json(&["toggle", &id]);
    assert_eq!(toggled["data"]["task"]["completed"].as_bool(), Some(true));

    let stored = data.read_tasks()?;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["completed"].as_bool(), Some(true));

    let removed = data.json(&["rm", &id]);
    assert_eq!(removed["data"]["remaining"].as_u64(), Some(0));
    assert!(data.read_tasks()?.is_empty());

    Ok(())
}

#[test]
fn persisted_records_use_camel_case() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::init()?;
    data.add(&["Pay rent", "--due", "2999-12-31", "-d", "  before the 1st  "]);

    let stored = data.read_tasks()?;
    assert_eq!(stored[0]["title"].as_str(), Some("Pay rent"));
    assert_eq!(stored[0]["description"].as_str(), Some("before the 1st"));
    assert_eq!(stored[0]["dueDate"].as_str(), Some("2999-12-31"));
    assert!(stored[0]["createdAt"].as_str().is_some());
    assert_eq!(stored[0]["priority"].as_str(), Some("medium"));

    Ok(())
}

#[test]
fn toggle_twice_restores_state() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::init()?;
    let id = data.add(&["Stretch"]);

    data.cmd().args(["done", &id]).assert().success();
    let value = data.json(&["toggle", &id]);
    assert_eq!(value["data"]["task"]["completed"].as_bool(), Some(false));

    Ok(())
}

#[test]
fn edit_changes_fields_but_not_identity() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::init()?;
    let id = data.add(&["Draft post", "--due", "2999-01-01"]);
    data.cmd().args(["toggle", &id]).assert().success();
    let before = data.read_tasks()?;

    let value = data.json(&[
        "edit",
        &id,
        "--title",
        " Publish post ",
        "--priority",
        "low",
        "--clear-due",
    ]);
    let task = &value["data"]["task"];
    assert_eq!(task["title"].as_str(), Some("Publish post"));
    assert_eq!(task["priority"].as_str(), Some("low"));
    assert!(task.get("dueDate").is_none());
    assert_eq!(task["completed"].as_bool(), Some(true));
    assert_eq!(task["createdAt"], before[0]["createdAt"]);
    assert_eq!(task["id"].as_str(), Some(id.as_str()));

    Ok(())
}

#[test]
fn edit_without_changes_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::init()?;
    let id = data.add(&["Nothing to change"]);

    data.cmd()
        .args(["edit", &id])
        .assert()
        .code(2)
        .stderr(contains("edit requires"));

    Ok(())
}

#[test]
fn prefix_resolves_task() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::init()?;
    let id = data.add(&["Prefix me"]);

    let value = data.json(&["show", &id[..12]]);
    assert_eq!(value["data"]["task"]["id"].as_str(), Some(id.as_str()));

    Ok(())
}

#[test]
fn unknown_id_is_user_error_and_leaves_storage_alone() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::init()?;
    data.add(&["Keep me"]);
    let before = std::fs::read_to_string(data.tasks_file())?;

    let output = data
        .cmd()
        .args(["rm", "nonexistent-id", "--json"])
        .assert()
        .code(2)
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output)?;
    assert_eq!(value["status"].as_str(), Some("error"));
    assert_eq!(value["error"]["kind"].as_str(), Some("user_error"));

    data.cmd().args(["toggle", "nonexistent-id"]).assert().code(2);

    assert_eq!(std::fs::read_to_string(data.tasks_file())?, before);
    Ok(())
}

#[test]
fn clear_completed_keeps_pending() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::init()?;
    let done = data.add(&["done"]);
    data.add(&["open"]);
    data.cmd().args(["toggle", &done]).assert().success();

    let value = data.json(&["clear-completed"]);
    assert_eq!(value["data"]["removed"].as_u64(), Some(1));
    assert_eq!(value["data"]["remaining"].as_u64(), Some(1));

    let stored = data.read_tasks()?;
    assert_eq!(stored[0]["title"].as_str(), Some("open"));
    Ok(())
}

#[test]
fn corrupt_state_starts_empty_with_warning() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::init()?;
    data.write_file("tasks.json", "{ not an array")?;

    data.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("stored tasks could not be read"))
        .stdout(contains("You don't have any tasks yet"));

    Ok(())
}

#[test]
fn id_commands_name_discarded_state() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::init()?;
    data.write_file("tasks.json", "{ not an array")?;

    for command in ["toggle", "rm", "show"] {
        data.cmd()
            .args([command, "01hxabcd"])
            .assert()
            .code(2)
            .stderr(contains("Task not found"))
            .stderr(contains("stored tasks could not be read"));
    }
    data.cmd()
        .args(["edit", "01hxabcd", "--title", "x"])
        .assert()
        .code(2)
        .stderr(contains("stored tasks could not be read"));

    Ok(())
}

#[test]
fn repeated_ids_in_state_are_discarded() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::init()?;
    data.write_file(
        "tasks.json",
        r#"[
            {"id":"1700000000000","title":"a","createdAt":"2024-01-01T00:00:00Z"},
            {"id":"1700000000000","title":"b","createdAt":"2024-01-01T00:00:00Z"}
        ]"#,
    )?;

    let value = data.json(&["list"]);
    assert_eq!(value["data"]["total"].as_u64(), Some(0));
    let warnings = value["warnings"].as_array().expect("warnings");
    assert!(warnings
        .iter()
        .filter_map(Value::as_str)
        .any(|warning| warning.contains("duplicate task id")));

    Ok(())
}
