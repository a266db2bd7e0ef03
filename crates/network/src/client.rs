use crate::body::{decode_body, encode_body};
use crate::error::ClientError;
use crate::transport::{HttpTransport, Transport};
use protocol::config::{extract_url, health_url, optimize_url};
use protocol::{
    prepare_junctions_for_api, ExtractRequest, ExtractResponse, HealthResponse, Junction,
    OptimizeOptions, OptimizeRequest, OptimizeResponse,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

/// Stateless wrapper around the three service endpoints. Inputs are sent as given;
/// checking cycle lengths beforehand is the caller's job.
#[derive(Debug, Clone)]
pub struct GreenwaveClient<T = HttpTransport> {
    transport: T,
    base_url: String,
}

impl GreenwaveClient<HttpTransport> {
    /// # Errors
    /// Returns [`ClientError::Build`] if the HTTP client cannot be created.
    pub fn connect(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Ok(Self::with_transport(HttpTransport::new()?, base_url))
    }
}

impl<T: Transport> GreenwaveClient<T> {
    pub fn with_transport(transport: T, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        info!("green-wave service at {base_url}");
        Self { transport, base_url }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// # Errors
    /// Propagates transport and decode failures unchanged.
    pub async fn health_check(&self) -> Result<HealthResponse, ClientError> {
        let url = health_url(&self.base_url);
        let body = self.transport.get(&url).await?;
        decode_body(&url, &body)
    }

    /// # Errors
    /// Propagates transport and decode failures unchanged.
    pub async fn extract_green_waves(
        &self,
        junctions: &[Junction],
        desired_speed_kmh: f64,
    ) -> Result<ExtractResponse, ClientError> {
        let request = ExtractRequest {
            junctions: prepare_junctions_for_api(junctions),
            desired_speed_kmh,
        };
        debug!("extracting green waves for {} junctions at {desired_speed_kmh} km/h", junctions.len());
        self.post(&extract_url(&self.base_url), &request).await
    }

    /// # Errors
    /// Propagates transport and decode failures unchanged.
    pub async fn optimize_offsets(
        &self,
        junctions: &[Junction],
        desired_speed_kmh: f64,
        options: &OptimizeOptions,
    ) -> Result<OptimizeResponse, ClientError> {
        let request =
            OptimizeRequest::new(prepare_junctions_for_api(junctions), desired_speed_kmh, options);
        debug!(
            "optimizing offsets for {} junctions with '{}' optimizer",
            junctions.len(),
            options.optimizer_type
        );
        self.post(&optimize_url(&self.base_url), &request).await
    }

    async fn post<Req, Resp>(&self, url: &str, request: &Req) -> Result<Resp, ClientError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let body = encode_body(request)?;
        let reply = self.transport.post_json(url, body).await?;
        decode_body(url, &reply)
    }
}
