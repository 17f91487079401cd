use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::net::TcpListener;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct Entry {
    id: u64,
    created_at: String,
    mood: String,
    notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Statistics {
    total_entries: u64,
    mood_counts: std::collections::BTreeMap<String, u64>,
    most_common_mood: Option<String>,
    unique_days_tracked: u64,
    current_streak: u64,
    average_entries_per_day: f64,
}

/// A server process with its own journal file, killed on drop.
struct TestServer {
    base_url: String,
    data_path: PathBuf,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        let _ = std::fs::remove_file(&self.data_path);
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path(tag: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!(
        "mood_journal_http_{tag}_{}_{nanos}.json",
        std::process::id()
    ))
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/moods")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server(data_path: PathBuf) -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_mood_journal"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", &data_path)
        .env("APP_UTC_OFFSET_MINUTES", "0")
        .env("APP_THEME", "doodle")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    let server = TestServer {
        base_url: format!("http://127.0.0.1:{port}"),
        data_path,
        child,
    };
    wait_until_ready(&server.base_url).await;
    server
}

async fn fresh_server(tag: &str) -> TestServer {
    spawn_server(unique_data_path(tag)).await
}

async fn post_entry(client: &Client, base_url: &str, mood: &str, notes: &str) -> Entry {
    let response = client
        .post(format!("{base_url}/api/entries"))
        .json(&serde_json::json!({ "mood": mood, "notes": notes }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.unwrap()
}

async fn fetch_stats(client: &Client, base_url: &str) -> Statistics {
    client
        .get(format!("{base_url}/api/stats"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_new_entry_counts_towards_todays_streak() {
    let server = fresh_server("streak").await;
    let client = Client::new();

    let before = fetch_stats(&client, &server.base_url).await;
    let entry = post_entry(&client, &server.base_url, "Happy", "Morning walk").await;
    assert_eq!(entry.mood, "Happy");
    assert_eq!(entry.notes.as_deref(), Some("Morning walk"));
    assert!(!entry.created_at.is_empty());

    let after = fetch_stats(&client, &server.base_url).await;
    assert_eq!(before.total_entries, 0);
    assert_eq!(before.current_streak, 0);
    assert_eq!(after.total_entries, 1);
    assert_eq!(after.current_streak, 1);
    assert_eq!(after.unique_days_tracked, 1);
    assert!(after.average_entries_per_day >= 1.0);
    assert_eq!(
        after.mood_counts.get("Happy").copied().unwrap_or(0),
        before.mood_counts.get("Happy").copied().unwrap_or(0) + 1
    );
    assert_eq!(after.mood_counts.values().sum::<u64>(), after.total_entries);
    assert!(after.most_common_mood.is_some());
}

#[tokio::test]
async fn http_search_filters_entries_newest_first() {
    let server = fresh_server("search").await;
    let client = Client::new();

    let first = post_entry(&client, &server.base_url, "Grateful", "family dinner").await;
    let second = post_entry(
        &client,
        &server.base_url,
        "Tired",
        "long shift, grateful it ended",
    )
    .await;
    post_entry(&client, &server.base_url, "Calm", "quiet evening").await;

    let found: Vec<Entry> = client
        .get(format!("{}/api/entries?q=GRATEFUL", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let ids: Vec<u64> = found.iter().map(|entry| entry.id).collect();
    assert_eq!(ids, [second.id, first.id]);

    let all: Vec<Entry> = client
        .get(format!("{}/api/entries", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.windows(2).all(|pair| pair[0].id > pair[1].id));
}

#[tokio::test]
async fn http_blank_mood_is_rejected() {
    let server = fresh_server("blank").await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/entries", server.base_url))
        .json(&serde_json::json!({ "mood": "   ", "notes": "nothing" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_moods_and_settings() {
    let server = fresh_server("moods").await;
    let client = Client::new();

    let moods: Vec<String> = client
        .get(format!("{}/api/moods", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(moods.len(), 10);
    assert_eq!(moods[0], "Happy");

    let settings: serde_json::Value = client
        .get(format!("{}/api/settings", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(settings["theme"], "doodle");
    assert_eq!(settings["utc_offset_minutes"], 0);
}

#[tokio::test]
async fn http_invalid_stored_entry_is_reported() {
    let data_path = unique_data_path("invalid");
    std::fs::write(
        &data_path,
        r#"{
            "next_id": 3,
            "entries": [
                {"id": 1, "created_at": "2024-01-15T09:00:00Z", "mood": "Happy"},
                {"id": 2, "mood": "Sad", "notes": "no timestamp"}
            ]
        }"#,
    )
    .unwrap();
    let server = spawn_server(data_path).await;
    let client = Client::new();

    for path in ["/api/stats", "/api/entries"] {
        let response = client
            .get(format!("{}{path}", server.base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.text().await.unwrap();
        assert!(body.contains("invalid entry 2"), "{path}: {body}");
    }
}
