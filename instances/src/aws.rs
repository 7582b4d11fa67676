//! AWS SDK connector.

use crate::{ConnectionKind, RegionConnector};
use async_trait::async_trait;
use aws_sdk_ec2::config::Region;
use errors::ConnectionError;
use tracing::{debug, info};

/// Opens EC2 clients through the AWS SDK default credential chain.
#[derive(Debug, Clone, Default)]
pub struct AwsConnector {
    endpoint: Option<String>
}

impl AwsConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send requests to `endpoint` instead of the regional AWS endpoint.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into())
        }
    }
}

#[async_trait]
impl RegionConnector for AwsConnector {
    type Handle = aws_sdk_ec2::Client;

    async fn connect(&self, kind: ConnectionKind, region: &str) -> Option<Self::Handle> {
        if !is_region_name(region) {
            debug!("{:?} is not an AWS region name", region);
            return None;
        }

        match kind {
            ConnectionKind::Ec2 => {
                let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                    .region(Region::new(region.to_string()))
                    .load()
                    .await;

                let mut client_config = aws_sdk_ec2::config::Builder::from(&config);
                if let Some(ep) = &self.endpoint {
                    debug!("Using EC2 endpoint override {}", ep);
                    client_config = client_config.endpoint_url(ep);
                }

                Some(aws_sdk_ec2::Client::from_conf(client_config.build()))
            }
        }
    }
}

/// Whether `region` has the shape of an AWS region name, e.g. `eu-west-1`
/// or `us-gov-east-1`: lowercase words joined by dashes, ending in a number.
///
/// Whether the region actually exists is only known after a request, see
/// [`region_names`].
pub fn is_region_name(region: &str) -> bool {
    let parts: Vec<&str> = region.split('-').collect();
    let Some((number, words)) = parts.split_last() else {
        return false;
    };
    words.len() >= 2
        && words
            .iter()
            .all(|w| !w.is_empty() && w.chars().all(|c| c.is_ascii_lowercase()))
        && !number.is_empty()
        && number.chars().all(|c| c.is_ascii_digit())
}

/// Names of the regions visible to the client's credentials.
///
/// Used as a cheap round trip to confirm that a connection is usable.
pub async fn region_names(
    client: &aws_sdk_ec2::Client,
    region: &str,
) -> Result<Vec<String>, ConnectionError> {
    let output = client
        .describe_regions()
        .send()
        .await
        .map_err(|e| ConnectionError::RequestFailed {
            operation: "DescribeRegions".to_string(),
            region: region.to_string(),
            reason: e.to_string()
        })?;

    let names: Vec<String> = output
        .regions()
        .iter()
        .filter_map(|r| r.region_name())
        .map(str::to_string)
        .collect();
    info!("EC2 reports {} regions", names.len());
    Ok(names)
}
