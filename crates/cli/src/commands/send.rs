//! `send` command implementation.

use anyhow::{Context, Result};
use contracts::{RetailerConfig, Task};
use service::{RetailerService, TaskSpec};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

use super::read_json;
use crate::cli::SendArgs;
use crate::error::CliError;

/// Execute the `send` command
pub async fn run_send(args: &SendArgs, config: &RetailerConfig) -> Result<()> {
    let specs: Vec<TaskSpec> = read_json(&args.tasks)?;
    info!(
        tasks = specs.len(),
        file = %args.tasks.display(),
        supplier = %config.supplier.base_url,
        dry_run = args.dry_run,
        "Sending tasks"
    );

    let retailer = RetailerService::from_config(config, args.dry_run)
        .await
        .context("Failed to start retailer service")?;
    let tasks = retailer
        .task_factory()
        .generate_all(specs)
        .context("Failed to generate tasks")?;
    let summary = retailer.send_tasks(tasks);
    info!(added = summary.added, queued = summary.total_tasks, "Tasks queued");

    let shutdown_signal = setup_shutdown_signal();
    let deadline = async {
        match args.timeout {
            0 => std::future::pending::<()>().await,
            secs => tokio::time::sleep(Duration::from_secs(secs)).await,
        }
    };

    tokio::select! {
        _ = retailer.wait_idle() => {
            info!("All tasks delivered");
        }
        _ = shutdown_signal => {
            warn!("Received shutdown signal, stopping dispatch...");
        }
        _ = deadline => {
            warn!(timeout_secs = args.timeout, "Timed out waiting for delivery");
        }
    }

    let snapshot = retailer.dispatch_metrics();
    let undelivered = retailer.shutdown().await;

    println!("\n=== Dispatch Summary ===\n");
    println!("{snapshot}");
    println!();

    if undelivered.is_empty() {
        return Ok(());
    }

    if let Some(path) = &args.undelivered {
        write_undelivered(path, &undelivered)?;
        info!(
            count = undelivered.len(),
            file = %path.display(),
            "Undelivered tasks saved"
        );
    }
    Err(CliError::Undelivered {
        count: undelivered.len(),
    }
    .into())
}

fn write_undelivered(path: &Path, tasks: &[Task]) -> crate::error::Result<()> {
    let json = serde_json::to_string_pretty(tasks)
        .map_err(|e| CliError::data_file(path, e.to_string()))?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Setup Ctrl+C and SIGTERM signal handlers
async fn setup_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config(dir: &tempfile::TempDir) -> RetailerConfig {
        let mut config = RetailerConfig::default();
        config.service.global_id = Some("blog.retailer".into());
        config.connector.data_path = dir.path().join("data.json");
        config
    }

    fn args(tasks: PathBuf) -> SendArgs {
        SendArgs {
            tasks,
            dry_run: true,
            timeout: 5,
            undelivered: None,
        }
    }

    #[tokio::test]
    async fn test_dry_run_delivers_everything() {
        let dir = tempfile::tempdir().unwrap();
        let tasks = dir.path().join("tasks.json");
        std::fs::write(
            &tasks,
            r#"[{"url": "http://exampleblog.munew.io/"}, {"url": "http://exampleblog.munew.io/page/2", "priority": 2}]"#,
        )
        .unwrap();

        run_send(&args(tasks), &config(&dir)).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_owner_fails_before_sending() {
        let dir = tempfile::tempdir().unwrap();
        let tasks = dir.path().join("tasks.json");
        std::fs::write(&tasks, r#"[{"url": "http://a"}]"#).unwrap();

        let mut config = config(&dir);
        config.service.global_id = None;

        let err = run_send(&args(tasks), &config).await.unwrap_err();
        assert!(err.to_string().contains("generate"));
    }

    #[test]
    fn test_write_undelivered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("left.json");
        let task = service::TaskFactory::new(Some("g".into()))
            .generate(TaskSpec::new("http://a"))
            .unwrap();

        write_undelivered(&path, &[task.clone()]).unwrap();

        let saved: Vec<Task> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved, vec![task]);
    }
}
