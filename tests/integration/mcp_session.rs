use chrono::NaiveDate;
use habit_streak::mcp::McpServer;
use habit_streak::*;
use serde_json::{json, Value};
use tempfile::NamedTempFile;

fn request(id: u64, method: &str, params: Value) -> String {
    json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params }).to_string()
}

fn tool(id: u64, name: &str, arguments: Value) -> String {
    request(id, "tools/call", json!({ "name": name, "arguments": arguments }))
}

/// Feed `lines` through a server and collect its responses
async fn session(server: &mut McpServer<SqliteStorage, &FixedClock>, lines: &[String]) -> Vec<Value> {
    let input = lines.join("\n") + "\n";
    let mut output = Vec::new();
    server.serve(input.as_bytes(), &mut output).await.unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn test_server_creation() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let server = HabitTrackerServer::new(
        temp_file.path().to_path_buf(),
        OwnerId::new("local").unwrap(),
        Calendar::utc(),
    );
    assert!(server.is_ok());
    assert!(server.unwrap().tracker().load_habits().unwrap().is_empty());
}

#[tokio::test]
async fn test_full_session() {
    let temp_file = NamedTempFile::new().unwrap();
    let clock = FixedClock::at_day(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
    let tracker = HabitTracker::new(
        SqliteStorage::new(temp_file.path().to_path_buf()).unwrap(),
        &clock,
        Calendar::utc(),
        OwnerId::new("local").unwrap(),
    );
    let mut server = McpServer::new(tracker);

    let opening = session(
        &mut server,
        &[
            request(1, "initialize", json!({ "protocolVersion": "2024-11-05", "capabilities": {} })),
            json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }).to_string(),
            request(2, "tools/list", json!({})),
            tool(3, "habit_create", json!({ "name": "Floss", "color": "red" })),
        ],
    )
    .await;

    // the notification gets no response
    assert_eq!(opening.len(), 3);
    assert!(server.is_initialized());
    assert_eq!(opening[0]["result"]["protocolVersion"], json!("2024-11-05"));
    assert_eq!(opening[1]["result"]["tools"].as_array().unwrap().len(), 7);

    let created = &opening[2]["result"];
    assert_eq!(created["isError"], json!(false));
    assert!(created["content"][0]["text"].as_str().unwrap().contains("Floss"));
    let habit_id = created["structuredContent"]["habit_id"].as_str().unwrap().to_string();

    clock.advance_days(1);
    let replies = session(
        &mut server,
        &[
            tool(4, "habit_toggle", json!({ "habit_id": habit_id, "date": "2024-06-03" })),
            tool(5, "habit_toggle", json!({ "habit_id": habit_id })),
            tool(6, "habit_list", json!({})),
            tool(7, "habit_week", json!({ "habit_id": habit_id, "week_starts_on": "monday" })),
            tool(8, "habit_stats", json!({ "habit_id": habit_id })),
        ],
    )
    .await;

    assert_eq!(replies[1]["result"]["structuredContent"]["current_streak"], json!(2));

    let list = &replies[2]["result"]["structuredContent"];
    assert_eq!(list["date"], json!("2024-06-04"));
    assert_eq!(list["habits"][0]["completed_on_date"], json!(true));
    assert_eq!(list["habits"][0]["color"], json!("#ef4444"));
    assert_eq!(list["summary"]["total_completions"], json!(2));

    // 2024-06-03 is a Monday
    let week = &replies[3]["result"]["structuredContent"];
    assert_eq!(week["week_start"], json!("2024-06-03"));
    assert_eq!(week["completed_count"], json!(2));
    assert_eq!(week["days"].as_array().unwrap().len(), 7);

    let stats = &replies[4]["result"]["structuredContent"];
    assert_eq!(stats["habit"]["success_rate"], json!(100));
    assert_eq!(stats["overall"]["best_streak"], json!(2));
}

#[tokio::test]
async fn test_update_and_delete_through_tools() {
    let clock = FixedClock::at_day(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
    let mut server = McpServer::new(HabitTracker::new(
        SqliteStorage::open_in_memory().unwrap(),
        &clock,
        Calendar::utc(),
        OwnerId::new("local").unwrap(),
    ));

    let created = session(&mut server, &[tool(1, "habit_create", json!({ "name": "Tea" }))]).await;
    let habit_id = created[0]["result"]["structuredContent"]["habit_id"].as_str().unwrap().to_string();

    let replies = session(
        &mut server,
        &[
            tool(2, "habit_update", json!({ "habit_id": habit_id })),
            tool(3, "habit_update", json!({ "habit_id": habit_id, "name": "Green tea", "color": "#10b981" })),
            tool(4, "habit_delete", json!({ "habit_id": habit_id })),
            tool(5, "habit_delete", json!({ "habit_id": habit_id })),
            tool(6, "habit_list", json!({ "sort_by": "colour" })),
        ],
    )
    .await;

    assert_eq!(replies[0]["result"]["isError"], json!(true));
    assert_eq!(replies[1]["result"]["structuredContent"]["name"], json!("Green tea"));
    assert_eq!(replies[1]["result"]["structuredContent"]["color"], json!("#10b981"));
    assert_eq!(replies[2]["result"]["isError"], json!(false));
    assert_eq!(replies[3]["result"]["isError"], json!(true));
    assert_eq!(replies[4]["result"]["isError"], json!(true));
    assert!(server.tracker().load_habits().unwrap().is_empty());
}
