//! Log streams written by the server, then rotated.

use std::time::Duration;

use filestore_api::logs::{LogEntry, LogManager, LogRotator};
use serde_json::Value;

mod common;

use common::{eventually, TestServer};

#[tokio::test]
async fn test_access_entries_survive_rotation() {
    let server = TestServer::start().await;

    for _ in 0..3 {
        server.client.get(server.url("ping")).send().await.unwrap();
    }

    let logs = server.logs.clone();
    let access = logs.active_path("server-access");
    assert!(
        eventually(|| {
            let access = access.clone();
            async move {
                std::fs::read_to_string(&access)
                    .map(|c| c.lines().count() == 3)
                    .unwrap_or(false)
            }
        })
        .await
    );

    let rotator = LogRotator::new(logs.clone(), Duration::from_secs(3600));
    let report = rotator.rotate_all().await;
    assert_eq!(report.failures().count(), 0);

    let (_, archive) = report
        .archived()
        .find(|(stream, _)| *stream == "server-access")
        .expect("access stream archived");
    let content = logs.decompress(archive).await.unwrap();

    let entries: Vec<LogEntry> = content
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(entries.len(), 3);
    assert!(entries.iter().all(|e| e.module == "server"));
    assert_eq!(entries[0].param["path"], Value::from("/ping"));

    assert_eq!(std::fs::metadata(&access).unwrap().len(), 0);

    server.stop().await;
}

#[tokio::test]
async fn test_rotation_during_appends_keeps_every_line() {
    let dir = tempfile::tempdir().unwrap();
    let logs = LogManager::new(dir.path());
    let rotator = LogRotator::new(logs.clone(), Duration::from_secs(3600));

    let writer = {
        let logs = logs.clone();
        tokio::spawn(async move {
            for i in 0..200 {
                logs.append("busy", &format!("line {i}")).await.unwrap();
                tokio::task::yield_now().await;
            }
        })
    };

    for _ in 0..5 {
        rotator.rotate_all().await;
        tokio::task::yield_now().await;
    }
    writer.await.unwrap();
    rotator.rotate_all().await;

    let mut lines = Vec::new();
    for id in logs.list(true).await.unwrap() {
        if id == "busy" {
            continue;
        }
        lines.extend(logs.decompress(&id).await.unwrap().lines().map(str::to_string));
    }
    lines.extend(
        std::fs::read_to_string(logs.active_path("busy"))
            .unwrap()
            .lines()
            .map(str::to_string),
    );

    lines.sort_by_key(|l| l.trim_start_matches("line ").parse::<u32>().unwrap());
    let expected: Vec<String> = (0..200).map(|i| format!("line {i}")).collect();
    assert_eq!(lines, expected);
}
