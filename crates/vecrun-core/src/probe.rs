use std::time::Duration;

use crate::models::ServiceEndpoint;

/// Single bounded-time health check against the backing service. Retry
/// policy, if any, belongs to the caller.
pub trait AvailabilityProbe: Send + Sync {
    fn is_reachable(&self, endpoint: &ServiceEndpoint) -> bool;
}

pub struct HttpProbe {
    agent: ureq::Agent,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(timeout)
                .timeout(timeout)
                .build(),
        }
    }
}

impl AvailabilityProbe for HttpProbe {
    fn is_reachable(&self, endpoint: &ServiceEndpoint) -> bool {
        match self.agent.get(&endpoint.health_url()).call() {
            Ok(response) => (200..300).contains(&response.status()),
            Err(error) => {
                tracing::debug!(url = %endpoint.health_url(), %error, "health check failed");
                false
            }
        }
    }
}
