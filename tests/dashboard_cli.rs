mod support;

use predicates::str::contains;

use support::TestData;

#[test]
fn dashboard_reports_totals_and_recent() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::init()?;
    let first = data.add(&["first", "--priority", "high"]);
    data.add(&["second", "--priority", "high"]);
    data.add(&["third"]);
    data.cmd().args(["toggle", &first]).assert().success();

    let value = data.json(&["dashboard"]);
    let stats = &value["data"];
    assert_eq!(value["command"].as_str(), Some("dashboard"));
    assert_eq!(stats["total"].as_u64(), Some(3));
    assert_eq!(stats["completed"].as_u64(), Some(1));
    assert_eq!(stats["pending"].as_u64(), Some(2));
    assert_eq!(stats["high_priority_pending"].as_u64(), Some(1));
    assert_eq!(stats["completion_rate"].as_u64(), Some(33));

    let recent: Vec<&str> = stats["recent"]
        .as_array()
        .expect("recent")
        .iter()
        .filter_map(|task| task["title"].as_str())
        .collect();
    assert_eq!(recent, ["third", "second", "first"]);

    assert_eq!(stats["progress"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[test]
fn dashboard_respects_recent_limit() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::init()?;
    data.write_file("taskflow.toml", "recent_limit = 2\n")?;
    for title in ["a", "b", "c"] {
        data.add(&[title]);
    }

    let value = data.json(&["dashboard"]);
    assert_eq!(value["data"]["recent"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[test]
fn empty_dashboard_suggests_adding() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::init()?;

    data.cmd()
        .arg("dashboard")
        .assert()
        .success()
        .stdout(contains("Completion Rate: 0%"))
        .stdout(contains("No tasks yet"))
        .stdout(contains("taskflow add"));
    Ok(())
}
