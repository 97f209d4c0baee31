//! # Integration Tests
//!
//! End-to-end tests across crates.
//!
//! Covers:
//! - Configuration file + environment -> running service
//! - Task delivery order, batching and retry through the service facade
//! - Data persistence through the JSON connector
//! - The HTTP transport against a local mock supplier

#[cfg(test)]
mod config_tests {
    use config_loader::{env, ConfigLoader};
    use contracts::ConnectorType;
    use std::collections::HashMap;

    #[test]
    fn test_file_then_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("retailer.toml");
        std::fs::write(
            &path,
            r#"
[service]
name = "blogs"
global_id = "from-file"

[supplier]
base_url = "http://supplier.local:9099"

[dispatch]
batch_size = 50
"#,
        )
        .unwrap();

        let vars = HashMap::from([
            (env::GLOBAL_ID, "from-env"),
            (env::CONNECTOR_TYPE, "json"),
            (env::DATA_PATH, "/tmp/retailer-data.json"),
        ]);
        let config = ConfigLoader::load_with_env(Some(&path), |key| {
            vars.get(key).map(|v| v.to_string())
        })
        .unwrap();

        assert_eq!(config.service.name, "blogs");
        assert_eq!(config.service.global_id.as_deref(), Some("from-env"));
        assert_eq!(config.supplier.base_url, "http://supplier.local:9099");
        assert_eq!(config.dispatch.batch_size, 50);
        assert_eq!(config.connector.connector_type, ConnectorType::Json);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use contracts::{
        DataConnector, OutboundRequest, RetailerConfig, Task, Transport, TransportError,
        TransportResponse,
    };
    use serde_json::{json, Value};
    use service::{Outcome, RetailerService, TaskSpec};

    /// Records every batch; fails the first `fail_first` attempts
    #[derive(Clone, Default)]
    struct RecordingTransport {
        batches: Arc<Mutex<Vec<Vec<Task>>>>,
        attempts: Arc<AtomicUsize>,
        fail_first: usize,
    }

    impl RecordingTransport {
        fn delivered(&self) -> Vec<String> {
            self.batches
                .lock()
                .unwrap()
                .iter()
                .flatten()
                .map(|t| t.url.clone())
                .collect()
        }
    }

    impl Transport for RecordingTransport {
        fn name(&self) -> &str {
            "recording"
        }

        async fn send(
            &self,
            request: &OutboundRequest,
        ) -> Result<TransportResponse, TransportError> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
            if attempt < self.fail_first {
                return Err(TransportError {
                    message: "supplier unavailable".into(),
                    status: Some(503),
                    request: request.summary(),
                    ..Default::default()
                });
            }
            let batch: Vec<Task> = serde_json::from_value(request.body.clone()).unwrap();
            self.batches.lock().unwrap().push(batch);
            Ok(TransportResponse {
                status: 200,
                ..Default::default()
            })
        }
    }

    fn config(dir: &tempfile::TempDir) -> RetailerConfig {
        let mut config = RetailerConfig::default();
        config.service.global_id = Some("blog.retailer".into());
        config.connector.data_path = dir.path().join("data.json");
        config
    }

    async fn json_connector(config: &RetailerConfig) -> connector::AnyConnector {
        connector::create_connector(&config.connector).await.unwrap()
    }

    fn specs(count: usize) -> Vec<TaskSpec> {
        (0..count)
            .map(|i| TaskSpec::new(format!("http://exampleblog.munew.io/page/{i}")))
            .collect()
    }

    /// Tasks from a single producer reach the supplier in order, in full batches
    #[tokio::test]
    async fn test_tasks_delivered_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let transport = RecordingTransport::default();
        let service =
            RetailerService::new(&config, transport.clone(), json_connector(&config).await);

        let tasks = service.task_factory().generate_all(specs(250)).unwrap();
        let expected: Vec<String> = tasks.iter().map(|t| t.url.clone()).collect();
        service.send_tasks(tasks);
        service.wait_idle().await;

        assert_eq!(transport.delivered(), expected);
        let sizes: Vec<usize> = transport.batches.lock().unwrap().iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![100, 100, 50]);
        assert!(service.shutdown().await.is_empty());
    }

    /// A failing supplier delays delivery but loses nothing
    #[tokio::test(start_paused = true)]
    async fn test_retry_until_supplier_recovers() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let transport = RecordingTransport {
            fail_first: 2,
            ..RecordingTransport::default()
        };
        let service =
            RetailerService::new(&config, transport.clone(), json_connector(&config).await);

        let start = tokio::time::Instant::now();
        service.send_tasks(service.task_factory().generate_all(specs(3)).unwrap());
        service.wait_idle().await;

        // 5 s after the first failure, 10 s after the second
        assert!(start.elapsed() >= Duration::from_secs(15));
        assert_eq!(transport.attempts.load(Ordering::SeqCst), 3);
        assert_eq!(transport.delivered().len(), 3);

        let metrics = service.dispatch_metrics();
        assert_eq!(metrics.batches_failed, 2);
        assert_eq!(metrics.backoff_ms, 0);
        service.shutdown().await;
    }

    /// Shutdown hands back what the supplier never accepted
    #[tokio::test(start_paused = true)]
    async fn test_shutdown_returns_undelivered() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let transport = RecordingTransport {
            fail_first: usize::MAX,
            ..RecordingTransport::default()
        };
        let service = RetailerService::new(&config, transport, json_connector(&config).await);

        service.send_tasks(service.task_factory().generate_all(specs(5)).unwrap());
        tokio::time::sleep(Duration::from_secs(1)).await;

        let undelivered = service.shutdown().await;
        assert_eq!(undelivered.len(), 5);
    }

    /// A keyed outcome lands in the JSON store next to the default collection
    #[tokio::test]
    async fn test_outcome_persisted_to_json_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let service = RetailerService::new(
            &config,
            RecordingTransport::default(),
            json_connector(&config).await,
        );

        let submission = service.submit(Outcome {
            tasks: Vec::new(),
            data: json!([{"title": "First post"}, "loose string"]),
            key: Some("blogs".into()),
        });
        let report = submission.push.unwrap().await.unwrap();
        assert_eq!(report.written, 2);

        let stored: Value =
            serde_json::from_str(&std::fs::read_to_string(&config.connector.data_path).unwrap())
                .unwrap();
        assert_eq!(stored["data"], json!([]));
        assert_eq!(
            stored["blogs"],
            json!([{"title": "First post"}, {"value": "loose string"}])
        );
        service.shutdown().await;
    }

    /// An empty push leaves the store file untouched
    #[tokio::test]
    async fn test_empty_push_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let connector = json_connector(&config).await;
        let before = std::fs::read(&config.connector.data_path).unwrap();

        for data in [json!([]), json!({}), json!(null), json!("")] {
            assert!(connector.push(data, "data").await.is_noop());
        }

        assert_eq!(std::fs::read(&config.connector.data_path).unwrap(), before);
    }

    /// Full stack over HTTP: headers, path and body reach the supplier
    #[tokio::test]
    async fn test_http_delivery_end_to_end() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/apis/tasks")
            .match_header("x-bitsky-requested-with", "blogs")
            .match_header("x-bitsky-security-key", "secret")
            .match_header("x-bitsky-job-id", mockito::Matcher::Any)
            .match_body(mockito::Matcher::PartialJson(json!([
                {
                    "url": "http://exampleblog.munew.io/page/0",
                    "soi": {"globalId": "blog.retailer"}
                }
            ])))
            .with_status(200)
            .with_body("[]")
            .expect(1)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut config = config(&dir);
        config.service.name = "blogs".into();
        config.supplier.base_url = server.url();
        config.supplier.api_key = Some("secret".into());

        let service = RetailerService::from_config(&config, false).await.unwrap();
        service.send_tasks(service.task_factory().generate_all(specs(1)).unwrap());
        service.wait_idle().await;

        mock.assert_async().await;
        assert_eq!(service.dispatch_metrics().delivered, 1);
        service.shutdown().await;
    }
}
