//! Controller connection establishment with ordered failover.

use crate::client::Client;
use crate::codec::PayloadConverter;
use crate::log::Logger;
use crate::retry::{retry, RetryPolicy};
use crate::{log_info, log_warn};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tonic::transport::{Channel, Endpoint};

/// Connection establishment failed against every configured controller.
#[derive(Debug, Error)]
#[error("failed to connect to any controller: {last_error}")]
pub struct ConnectError {
    last_error: String,
}

impl ConnectError {
    /// The last underlying dial error observed.
    pub fn last_error(&self) -> &str {
        &self.last_error
    }
}

/// Connects to the region, trying controllers in configuration order.
///
/// Each candidate gets a fresh retry budget; the connector only gives up
/// once every candidate has exhausted its own budget. The dial step is
/// injectable so connection sequencing can be tested without a network.
pub struct Connector {
    endpoints: Vec<String>,
    port: u16,
    policy: RetryPolicy,
    converter: Arc<PayloadConverter>,
    logger: Arc<dyn Logger>,
}

impl Connector {
    /// Create a connector over the ordered controller hosts.
    pub fn new(
        endpoints: Vec<String>,
        port: u16,
        converter: Arc<PayloadConverter>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            endpoints,
            port,
            policy: RetryPolicy::default(),
            converter,
            logger,
        }
    }

    /// Replace the per-candidate retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Connect to the first reachable controller.
    pub async fn connect(&self) -> Result<Client, ConnectError> {
        self.connect_with(dial_endpoint).await
    }

    /// Connect using a caller-supplied dial function.
    pub async fn connect_with<F, Fut, E>(&self, mut dial: F) -> Result<Client, ConnectError>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<Channel, E>>,
        E: std::fmt::Display,
    {
        let mut last_error = None;

        for endpoint in &self.endpoints {
            let address = format!("http://{}:{}", endpoint, self.port);
            log_info!(self.logger, "Connecting to controller {}", address);

            match retry(&self.policy, || dial(address.clone())).await {
                Ok(channel) => {
                    log_info!(self.logger, "Connected to controller {}", address);
                    return Ok(Client::new(
                        channel,
                        Arc::clone(&self.converter),
                        Arc::clone(&self.logger),
                    ));
                }
                Err(err) => {
                    log_warn!(
                        self.logger,
                        "Controller {} unreachable, trying next candidate: {}",
                        address,
                        err
                    );
                    last_error = Some(err.to_string());
                }
            }
        }

        Err(ConnectError {
            last_error: last_error.unwrap_or_else(|| "no controllers configured".to_string()),
        })
    }
}

async fn dial_endpoint(address: String) -> Result<Channel, tonic::transport::Error> {
    Endpoint::from_shared(address)?.connect().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::EncryptionCodec;
    use crate::log::NoOpLogger;
    use crate::retry::RetryJitter;
    use std::sync::Mutex;
    use std::time::Duration;

    fn test_connector(endpoints: Vec<&str>) -> Connector {
        let converter = Arc::new(PayloadConverter::new(
            EncryptionCodec::new(b"test secret").unwrap(),
        ));
        // Three attempts per candidate: 100ms + 200ms fit, 400ms does not
        let policy = RetryPolicy::default()
            .with_base_delay(Duration::from_millis(100))
            .with_max_elapsed(Duration::from_millis(350))
            .with_jitter(RetryJitter::None);

        Connector::new(
            endpoints.into_iter().map(String::from).collect(),
            5271,
            converter,
            Arc::new(NoOpLogger),
        )
        .with_policy(policy)
    }

    fn lazy_channel() -> Channel {
        Endpoint::from_static("http://127.0.0.1:5271").connect_lazy()
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_first_candidate_success() {
        let connector = test_connector(vec!["region-a", "region-b"]);
        let dialed = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&dialed);
        let result = connector
            .connect_with(move |address| {
                log.lock().unwrap().push(address);
                async { Ok::<_, String>(lazy_channel()) }
            })
            .await;

        assert!(result.is_ok());
        assert_eq!(*dialed.lock().unwrap(), vec!["http://region-a:5271"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_fails_over_in_order() {
        let connector = test_connector(vec!["region-a", "region-b"]);
        let dialed = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&dialed);
        let result = connector
            .connect_with(move |address| {
                log.lock().unwrap().push(address.clone());
                async move {
                    if address.contains("region-a") {
                        Err("connection refused".to_string())
                    } else {
                        Ok(lazy_channel())
                    }
                }
            })
            .await;

        assert!(result.is_ok());
        let dialed = dialed.lock().unwrap();
        // Candidate A exhausts its own budget before B is tried
        assert_eq!(dialed[..3], ["http://region-a:5271"; 3]);
        assert_eq!(dialed[3], "http://region-b:5271");
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_fresh_budget_per_candidate() {
        let connector = test_connector(vec!["region-a", "region-b"]);
        let attempts = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&attempts);
        let result = connector
            .connect_with(move |address| {
                log.lock().unwrap().push(address);
                async { Err::<Channel, _>("connection refused".to_string()) }
            })
            .await;

        assert!(result.is_err());
        // Both candidates get the full three attempts
        let attempts = attempts.lock().unwrap();
        assert_eq!(attempts.len(), 6);
        assert_eq!(attempts[..3], ["http://region-a:5271"; 3]);
        assert_eq!(attempts[3..], ["http://region-b:5271"; 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_error_carries_last_failure() {
        let connector = test_connector(vec!["region-a", "region-b"]);

        let err = connector
            .connect_with(|address| async move { Err::<Channel, _>(format!("{} down", address)) })
            .await
            .unwrap_err();

        assert_eq!(err.last_error(), "http://region-b:5271 down");
        assert!(err.to_string().contains("region-b"));
    }
}
