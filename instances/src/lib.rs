//! # Handson Instances
//!
//! Lazily opened, memoized cloud connections.
//!
//! `Instances` keeps one handle per connection kind. The first request for a
//! kind opens the handle through a `RegionConnector`; later requests reuse
//! it. There is a single attempt per open, with no retry and no timeout.

pub mod aws;

use async_trait::async_trait;
use errors::ConnectionError;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

pub use aws::AwsConnector;

/// Kind of cloud connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionKind {
    Ec2
}

impl ConnectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionKind::Ec2 => "ec2"
        }
    }
}

impl fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opens connections to a cloud region.
#[async_trait]
pub trait RegionConnector: Send + Sync {
    type Handle: Clone + Send + Sync;

    /// Open a connection of `kind` to `region`. `None` means no usable
    /// handle could be established.
    async fn connect(&self, kind: ConnectionKind, region: &str) -> Option<Self::Handle>;
}

/// Connection cache keyed by connection kind.
pub struct Instances<C: RegionConnector> {
    connector: C,
    region: String,
    connections: HashMap<ConnectionKind, C::Handle>
}

impl<C: RegionConnector> Instances<C> {
    pub fn new(connector: C, region: impl Into<String>) -> Self {
        Self {
            connector,
            region: region.into(),
            connections: HashMap::new()
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn is_connected(&self, kind: ConnectionKind) -> bool {
        self.connections.contains_key(&kind)
    }

    /// Fetch the connection of `kind`, opening it if necessary.
    pub async fn connection(&mut self, kind: ConnectionKind) -> Result<C::Handle, ConnectionError> {
        if let Some(handle) = self.connections.get(&kind) {
            return Ok(handle.clone());
        }

        debug!("Connecting to {} region {}", kind, self.region);
        let handle = self
            .connector
            .connect(kind, &self.region)
            .await
            .ok_or_else(|| ConnectionError::ConnectFailed {
                kind: kind.to_string(),
                region: self.region.clone()
            })?;
        self.connections.insert(kind, handle.clone());
        Ok(handle)
    }

    /// Fetch the EC2 connection, opening it if necessary.
    pub async fn ec2(&mut self) -> Result<C::Handle, ConnectionError> {
        self.connection(ConnectionKind::Ec2).await
    }
}
