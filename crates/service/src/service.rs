//! RetailerService - dispatch queue and connector behind one handle

use std::sync::Arc;

use contracts::{DataConnector, PushReport, RetailerConfig, Task, Transport, DEFAULT_COLLECTION};
use dispatcher::{
    create_transport, DispatchConfig, DispatchQueue, DispatchSnapshot, DispatchState,
    EnqueueSummary,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use connector::{create_connector, is_empty_payload, AnyConnector};

use crate::error::Result;
use crate::task_factory::{TaskFactory, TaskSpec};

/// What a trigger or parse step produced
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Follow-up tasks for the supplier
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Extracted data to persist
    #[serde(default)]
    pub data: Value,
    /// Collection for non-object data (default `"data"`)
    #[serde(default)]
    pub key: Option<String>,
}

/// Result of [`RetailerService::submit`]
#[derive(Debug)]
pub struct Submission {
    pub enqueued: EnqueueSummary,
    /// Running push; None when there was no data
    pub push: Option<JoinHandle<PushReport>>,
}

/// Retailer service handle
pub struct RetailerService<C> {
    factory: TaskFactory,
    queue: DispatchQueue,
    connector: Arc<C>,
}

impl RetailerService<AnyConnector> {
    /// Wire the service from configuration
    ///
    /// `dry_run` logs batches instead of sending them.
    ///
    /// # Errors
    /// - Transport creation failure
    /// - Connector creation failure (store path, missing Mongo URL)
    #[instrument(name = "retailer_service_from_config", skip(config))]
    pub async fn from_config(config: &RetailerConfig, dry_run: bool) -> Result<Self> {
        let transport = create_transport(config, dry_run)?;
        let connector = create_connector(&config.connector).await?;
        Ok(Self::new(config, transport, connector))
    }
}

impl<C: DataConnector + Sync + 'static> RetailerService<C> {
    /// Wire the service with explicit collaborators
    ///
    /// Spawns the dispatch worker; must be called inside a Tokio runtime.
    pub fn new<T>(config: &RetailerConfig, transport: T, connector: C) -> Self
    where
        T: Transport + Sync + 'static,
    {
        info!(
            service = %config.service.name,
            global_id = ?config.service.global_id,
            transport = transport.name(),
            connector = connector.name(),
            "Retailer service started"
        );

        Self {
            factory: TaskFactory::new(config.service.global_id.clone()),
            queue: DispatchQueue::spawn(transport, DispatchConfig::from_config(config)),
            connector: Arc::new(connector),
        }
    }

    pub fn task_factory(&self) -> &TaskFactory {
        &self.factory
    }

    pub fn connector(&self) -> &Arc<C> {
        &self.connector
    }

    /// Build a task owned by this service
    pub fn generate_task(&self, spec: TaskSpec) -> Result<Task> {
        self.factory.generate(spec)
    }

    /// Queue tasks for delivery to the supplier; returns immediately
    pub fn send_tasks(&self, tasks: Vec<Task>) -> EnqueueSummary {
        self.queue.enqueue(tasks)
    }

    /// Persist data in the background
    pub fn push_data(&self, data: Value, key: Option<String>) -> JoinHandle<PushReport> {
        let connector = Arc::clone(&self.connector);
        let key = key.unwrap_or_else(|| DEFAULT_COLLECTION.to_string());
        tokio::spawn(async move { connector.push(data, &key).await })
    }

    /// Hand over a trigger/parse outcome
    ///
    /// Tasks are queued and the push is spawned; neither waits for the other.
    pub fn submit(&self, outcome: Outcome) -> Submission {
        let Outcome { tasks, data, key } = outcome;

        let enqueued = self.send_tasks(tasks);
        let push = if is_empty_payload(&data) {
            None
        } else {
            Some(self.push_data(data, key))
        };

        debug!(
            added = enqueued.added,
            queued = enqueued.total_tasks,
            pushing = push.is_some(),
            "Outcome submitted"
        );
        Submission { enqueued, push }
    }

    pub fn state(&self) -> DispatchState {
        self.queue.state()
    }

    pub fn dispatch_metrics(&self) -> DispatchSnapshot {
        self.queue.metrics()
    }

    /// Resolve once every queued task has been delivered
    pub async fn wait_idle(&self) {
        self.queue.wait_idle().await;
    }

    /// Stop dispatching; returns tasks that were never delivered
    #[instrument(name = "retailer_service_shutdown", skip(self))]
    pub async fn shutdown(self) -> Vec<Task> {
        let undelivered = self.queue.shutdown().await;
        info!(undelivered = undelivered.len(), "Retailer service stopped");
        undelivered
    }
}
