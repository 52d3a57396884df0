//! Hook registry and command dispatch.
//!
//! `HookService` owns every attached hook and its monitor task. All
//! state lives in the service instance; callers hold it behind whatever
//! sharing they need (typically an `Arc` in the transport layer).

use super::commands::{Command, CommandResponse, MemoryEvent, ResponseData};
use super::monitor::{self, MonitorHandle};
use crate::config::EngineConfig;
use crate::core::types::{Address, DataType, HookError, HookResult, MemoryValue};
use crate::memory::{resolver, scanner};
use crate::os::{ProcessMemory, SystemApi};
use crate::process;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};

struct Hook {
    process_name: String,
    base_address: Address,
    offsets: Vec<i64>,
    data_type: DataType,
    memory: Arc<dyn ProcessMemory>,
    monitor: Option<MonitorHandle>,
}

/// Registry of named hooks plus their monitor tasks.
pub struct HookService {
    api: Arc<dyn SystemApi>,
    config: EngineConfig,
    hooks: Mutex<HashMap<String, Hook>>,
    events: mpsc::UnboundedSender<MemoryEvent>,
}

impl HookService {
    /// Build a service and the receiving end of its notification stream.
    pub fn new(
        api: Arc<dyn SystemApi>,
        config: EngineConfig,
    ) -> (Self, mpsc::UnboundedReceiver<MemoryEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let service = HookService {
            api,
            config,
            hooks: Mutex::new(HashMap::new()),
            events,
        };
        (service, receiver)
    }

    /// Dispatch one command, turning every failure into a reply envelope.
    pub async fn handle(&self, command: Command) -> CommandResponse {
        let result = match command {
            Command::ListProcesses => self.list_processes(),
            Command::CreateMemoryHook {
                hook_id,
                process_name,
                base_address,
                offsets,
                data_type,
            } => {
                self.create_hook(hook_id, process_name, base_address, offsets, data_type)
                    .await
            }
            Command::ScanMemory {
                hook_id,
                value,
                data_type,
                max_results,
            } => self.scan_memory(&hook_id, value, data_type, max_results).await,
            Command::ReadMemoryValue { hook_id } => self.read_value(&hook_id).await,
            Command::StartMemoryMonitoring { hook_id, interval } => {
                self.start_monitoring(&hook_id, interval).await
            }
            Command::StopMemoryMonitoring { hook_id } => self.stop_monitoring(&hook_id).await,
            Command::DetachMemoryHook { hook_id } => self.detach_hook(&hook_id).await,
        };

        result.unwrap_or_else(CommandResponse::from)
    }

    fn list_processes(&self) -> HookResult<CommandResponse> {
        let processes = process::list_processes(self.api.as_ref());
        debug!(count = processes.len(), "listed processes");
        Ok(CommandResponse::with(ResponseData::Processes { processes }))
    }

    /// Attach to the named process and register the hook.
    ///
    /// Registering under an existing id replaces the previous hook. A
    /// monitor still running on the replaced hook keeps its own clones
    /// of the handle and winds down on its own cadence.
    async fn create_hook(
        &self,
        hook_id: String,
        process_name: String,
        base_address: Address,
        offsets: Vec<i64>,
        data_type: DataType,
    ) -> HookResult<CommandResponse> {
        let memory: Arc<dyn ProcessMemory> =
            Arc::from(process::attach(self.api.as_ref(), &process_name)?);
        info!(hook = %hook_id, process = %process_name, pid = memory.pid(), "hook created");

        let hook = Hook {
            process_name,
            base_address,
            offsets,
            data_type,
            memory,
            monitor: None,
        };

        let mut hooks = self.hooks.lock().await;
        hooks.insert(hook_id.clone(), hook);
        Ok(CommandResponse::with(ResponseData::Hook { hook_id }))
    }

    async fn scan_memory(
        &self,
        hook_id: &str,
        value: serde_json::Value,
        data_type: DataType,
        max_results: Option<usize>,
    ) -> HookResult<CommandResponse> {
        let memory = {
            let hooks = self.hooks.lock().await;
            let hook = hooks
                .get(hook_id)
                .ok_or_else(|| HookError::HookNotFound(hook_id.to_string()))?;
            Arc::clone(&hook.memory)
        };

        let pattern = MemoryValue::from_json(&value, data_type)?.to_bytes();
        let max_results = max_results.unwrap_or(self.config.max_scan_results);
        let chunk_size = self.config.scan_chunk_size;

        // Walking a whole address space can take a while; keep it off the
        // async workers.
        let addresses = tokio::task::spawn_blocking(move || {
            scanner::scan(memory.as_ref(), &pattern, max_results, chunk_size)
        })
        .await
        .map_err(|e| HookError::Os(format!("scan task failed: {}", e)))?;

        info!(hook = %hook_id, matches = addresses.len(), "scan finished");
        Ok(CommandResponse::with(ResponseData::Addresses { addresses }))
    }

    async fn read_value(&self, hook_id: &str) -> HookResult<CommandResponse> {
        let (memory, base_address, offsets, data_type) = {
            let hooks = self.hooks.lock().await;
            let hook = hooks
                .get(hook_id)
                .ok_or_else(|| HookError::HookNotFound(hook_id.to_string()))?;
            (
                Arc::clone(&hook.memory),
                hook.base_address,
                hook.offsets.clone(),
                hook.data_type,
            )
        };

        let value = resolver::read_value(memory.as_ref(), base_address, &offsets, data_type)?;
        Ok(CommandResponse::with(ResponseData::Value { value }))
    }

    async fn start_monitoring(
        &self,
        hook_id: &str,
        interval: Option<f64>,
    ) -> HookResult<CommandResponse> {
        let interval = match interval {
            Some(secs) if secs > 0.0 => Duration::try_from_secs_f64(secs).map_err(|_| {
                HookError::Config(format!("monitor interval out of range: {}", secs))
            })?,
            Some(secs) => {
                return Err(HookError::Config(format!(
                    "monitor interval must be positive, got {}",
                    secs
                )))
            }
            None => self.config.poll_interval(),
        };

        let mut hooks = self.hooks.lock().await;
        let hook = hooks
            .get_mut(hook_id)
            .ok_or_else(|| HookError::HookNotFound(hook_id.to_string()))?;

        if hook.monitor.as_ref().is_some_and(MonitorHandle::is_running) {
            debug!(hook = %hook_id, "monitor already running");
            return Ok(CommandResponse::ok());
        }

        info!(hook = %hook_id, ?interval, "monitoring started");
        hook.monitor = Some(monitor::spawn(
            hook_id.to_string(),
            Arc::clone(&hook.memory),
            hook.base_address,
            hook.offsets.clone(),
            hook.data_type,
            interval,
            self.events.clone(),
        ));
        Ok(CommandResponse::ok())
    }

    /// Stop a hook's monitor. Succeeds whether or not one was running,
    /// and whether or not the hook exists: stopping is idempotent.
    async fn stop_monitoring(&self, hook_id: &str) -> HookResult<CommandResponse> {
        let handle = {
            let mut hooks = self.hooks.lock().await;
            hooks.get_mut(hook_id).and_then(|hook| hook.monitor.take())
        };

        if let Some(handle) = handle {
            handle.stop(self.config.stop_timeout()).await;
            info!(hook = %hook_id, "monitoring stopped");
        }
        Ok(CommandResponse::ok())
    }

    /// Remove a hook, stopping its monitor and releasing the process
    /// handle. Detaching an unknown id succeeds.
    async fn detach_hook(&self, hook_id: &str) -> HookResult<CommandResponse> {
        let removed = {
            let mut hooks = self.hooks.lock().await;
            hooks.remove(hook_id)
        };

        if let Some(hook) = removed {
            if let Some(handle) = hook.monitor {
                handle.stop(self.config.stop_timeout()).await;
            }
            info!(hook = %hook_id, process = %hook.process_name, "hook detached");
        }
        Ok(CommandResponse::ok())
    }

    /// Tear down every hook and monitor. Called on shutdown.
    pub async fn detach_all(&self) {
        let drained: Vec<Hook> = {
            let mut hooks = self.hooks.lock().await;
            hooks.drain().map(|(_, hook)| hook).collect()
        };

        for hook in drained {
            if let Some(handle) = hook.monitor {
                handle.stop(self.config.stop_timeout()).await;
            }
        }
    }
}
