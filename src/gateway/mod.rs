//! Gateway: the main event loop connecting channels and the prompt pipeline.
//!
//! Each message gets its own task; the health listener runs beside them.

mod pipeline;


use promptwright_core::{
    config::{HealthConfig, Messages, PromptConfig},
    message::{IncomingMessage, OutgoingMessage},
    orchestrator::Orchestrator,
    traits::{Channel, PromptRunner},
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// The central gateway that routes messages between channels and the registry.
pub struct Gateway {
    channels: HashMap<String, Arc<dyn Channel>>,
    orchestrator: Orchestrator,
    /// Present in run mode: rendered prompts are executed remotely.
    runner: Option<Arc<dyn PromptRunner>>,
    prompt_config: PromptConfig,
    health_config: HealthConfig,
    messages: Messages,
}

impl Gateway {
    /// Create a new gateway.
    pub fn new(
        channels: HashMap<String, Arc<dyn Channel>>,
        orchestrator: Orchestrator,
        runner: Option<Arc<dyn PromptRunner>>,
        prompt_config: PromptConfig,
        health_config: HealthConfig,
        messages: Messages,
    ) -> Self {
        Self {
            channels,
            orchestrator,
            runner,
            prompt_config,
            health_config,
            messages,
        }
    }

    /// Run the main event loop.
    pub async fn run(self: Arc<Self>) -> anyhow::Result<()> {
        info!(
            "Promptwright gateway running | channels: {} | mode: {} | health: {}",
            self.channels.keys().cloned().collect::<Vec<_>>().join(", "),
            if self.runner.is_some() { "run" } else { "render" },
            if self.health_config.enabled {
                "enabled"
            } else {
                "disabled"
            },
        );

        let (tx, mut rx) = mpsc::channel::<IncomingMessage>(256);

        for (name, channel) in &self.channels {
            let mut channel_rx = channel
                .start()
                .await
                .map_err(|e| anyhow::anyhow!("failed to start channel {name}: {e}"))?;
            let tx = tx.clone();
            let channel_name = name.clone();

            tokio::spawn(async move {
                while let Some(msg) = channel_rx.recv().await {
                    if tx.send(msg).await.is_err() {
                        info!("gateway receiver dropped, stopping {channel_name} forwarder");
                        break;
                    }
                }
            });

            info!("Channel started: {name}");
        }

        drop(tx);

        // Spawn health listener.
        let health_handle = if self.health_config.enabled {
            let cfg = self.health_config.clone();
            Some(tokio::spawn(crate::health::supervise(cfg)))
        } else {
            None
        };

        // Main event loop with graceful shutdown.
        loop {
            tokio::select! {
                msg = rx.recv() => match msg {
                    Some(incoming) => {
                        let gw = self.clone();
                        tokio::spawn(async move {
                            gw.handle_message(incoming).await;
                        });
                    }
                    None => {
                        warn!("all channels closed");
                        break;
                    }
                },
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        if let Some(handle) = health_handle {
            handle.abort();
        }
        for (name, channel) in &self.channels {
            if let Err(e) = channel.stop().await {
                warn!("failed to stop channel {name}: {e}");
            }
        }
        info!("Promptwright gateway stopped");
        Ok(())
    }

    /// Send a plain reply to the sender of `incoming`. Failures are logged.
    async fn send_text(&self, incoming: &IncomingMessage, text: &str) -> Option<String> {
        let channel = self.channels.get(&incoming.channel)?;
        match channel.send(OutgoingMessage::reply_to(incoming, text)).await {
            Ok(id) => id,
            Err(e) => {
                warn!("failed to send reply on {}: {e}", incoming.channel);
                None
            }
        }
    }
}
