//! Orchestrator client.
//!
//! [`Connector`] establishes the gRPC channel to the region, trying each
//! configured controller in order with its own retry budget. The resulting
//! [`Client`] bundles the channel with the payload converter so everything
//! downstream speaks the encrypted wire format.

mod connector;

pub use connector::{ConnectError, Connector};

use crate::codec::PayloadConverter;
use crate::log::Logger;
use maasagent_proto::orchestrator_client::OrchestratorClient;
use std::sync::Arc;
use tonic::transport::Channel;

/// Handle to a connected orchestrator.
///
/// Cheap to clone; the underlying channel multiplexes requests.
#[derive(Clone)]
pub struct Client {
    channel: Channel,
    converter: Arc<PayloadConverter>,
    logger: Arc<dyn Logger>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

impl Client {
    pub(crate) fn new(
        channel: Channel,
        converter: Arc<PayloadConverter>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            channel,
            converter,
            logger,
        }
    }

    /// Create an orchestrator stub over the connected channel.
    pub fn orchestrator(&self) -> OrchestratorClient<Channel> {
        OrchestratorClient::new(self.channel.clone())
    }

    /// The payload converter applied to task inputs and outputs.
    pub fn converter(&self) -> &PayloadConverter {
        &self.converter
    }

    /// The logger handle threaded through this client.
    pub fn logger(&self) -> Arc<dyn Logger> {
        Arc::clone(&self.logger)
    }
}
