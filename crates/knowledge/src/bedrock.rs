//! Amazon Bedrock knowledge-base backend.
//!
//! Calls the Agent Runtime `Retrieve` API, which runs a vector search over
//! a managed knowledge base and returns ranked passages with their source
//! locations.

use async_trait::async_trait;
use praias_core::error::RetrievalError;
use praias_core::knowledge::{KnowledgeBackend, RetrievedPassage};
use praias_security::{Credentials, SignableRequest, SigningScope};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const SIGNING_SERVICE: &str = "bedrock";

/// Bedrock Agent Runtime retrieval backend.
pub struct BedrockKnowledgeBackend {
    base_url: String,
    region: String,
    credentials: Option<Credentials>,
    client: reqwest::Client,
}

impl BedrockKnowledgeBackend {
    /// Create a backend for `region` using the public agent-runtime endpoint.
    pub fn new(region: impl Into<String>, credentials: Option<Credentials>) -> Self {
        let region = region.into();
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: format!("https://bedrock-agent-runtime.{region}.amazonaws.com"),
            region,
            credentials,
            client,
        }
    }

    /// Create from the `[aws]` config section.
    pub fn from_config(aws: &praias_config::AwsConfig) -> Self {
        Self::new(&aws.region, Credentials::from_config(aws))
            .with_base_url(aws.agent_runtime_url())
    }

    /// Override the endpoint (tests, VPC endpoints).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn retrieve_url(&self, knowledge_base_id: &str) -> String {
        format!(
            "{}/knowledgebases/{}/retrieve",
            self.base_url,
            praias_security::uri_encode(knowledge_base_id, true)
        )
    }
}

#[async_trait]
impl KnowledgeBackend for BedrockKnowledgeBackend {
    fn name(&self) -> &str {
        "bedrock-kb"
    }

    async fn retrieve(
        &self,
        knowledge_base_id: &str,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<RetrievedPassage>, RetrievalError> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            RetrievalError::NotConfigured("AWS credentials missing".into())
        })?;

        let body = RetrieveRequest {
            retrieval_query: RetrievalQuery { text: query },
            retrieval_configuration: RetrievalConfiguration {
                vector_search_configuration: VectorSearchConfiguration {
                    number_of_results: top_k,
                },
            },
        };
        let payload = serde_json::to_vec(&body)
            .map_err(|e| RetrievalError::InvalidResponse(format!("Failed to encode request: {e}")))?;

        let url = reqwest::Url::parse(&self.retrieve_url(knowledge_base_id))
            .map_err(|e| RetrievalError::NotConfigured(format!("Invalid agent-runtime endpoint: {e}")))?;
        let host = match (url.host_str(), url.port()) {
            (Some(h), Some(p)) => format!("{h}:{p}"),
            (Some(h), None) => h.to_string(),
            (None, _) => {
                return Err(RetrievalError::NotConfigured(
                    "Agent-runtime endpoint has no host".into(),
                ));
            }
        };

        let signed = praias_security::sign(
            &SignableRequest {
                method: "POST",
                host: &host,
                path: url.path(),
                query: "",
                headers: vec![("content-type", "application/json")],
                body: &payload,
            },
            credentials,
            SigningScope {
                region: &self.region,
                service: SIGNING_SERVICE,
            },
            chrono::Utc::now(),
        );

        debug!(kb_id = %knowledge_base_id, top_k, "Sending retrieve request");

        let mut builder = self
            .client
            .post(url)
            .header("Content-Type", "application/json");
        for (name, value) in signed {
            builder = builder.header(name, value);
        }

        let response = builder
            .body(payload)
            .send()
            .await
            .map_err(|e| RetrievalError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 401 || status == 403 {
            let error_body = response.text().await.unwrap_or_default();
            return Err(RetrievalError::AuthenticationFailed(error_body));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Knowledge base returned error");
            return Err(RetrievalError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: RetrieveResponse = response
            .json()
            .await
            .map_err(|e| RetrievalError::InvalidResponse(e.to_string()))?;

        Ok(api_response
            .retrieval_results
            .into_iter()
            .map(|r| RetrievedPassage {
                text: r.content.and_then(|c| c.text).unwrap_or_default(),
                location_uri: r.location.and_then(Location::into_uri),
                score: r.score,
            })
            .collect())
    }
}

// ── Retrieve API types ────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RetrieveRequest<'a> {
    retrieval_query: RetrievalQuery<'a>,
    retrieval_configuration: RetrievalConfiguration,
}

#[derive(Serialize)]
struct RetrievalQuery<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RetrievalConfiguration {
    vector_search_configuration: VectorSearchConfiguration,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VectorSearchConfiguration {
    number_of_results: usize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RetrieveResponse {
    #[serde(default)]
    retrieval_results: Vec<RetrievalResult>,
}

#[derive(Deserialize)]
struct RetrievalResult {
    content: Option<ResultContent>,
    location: Option<Location>,
    score: Option<f32>,
}

#[derive(Deserialize)]
struct ResultContent {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Location {
    s3_location: Option<S3Location>,
    web_location: Option<UrlLocation>,
    confluence_location: Option<UrlLocation>,
    salesforce_location: Option<UrlLocation>,
    share_point_location: Option<UrlLocation>,
}

impl Location {
    fn into_uri(self) -> Option<String> {
        self.s3_location
            .and_then(|l| l.uri)
            .or_else(|| self.web_location.and_then(|l| l.url))
            .or_else(|| self.confluence_location.and_then(|l| l.url))
            .or_else(|| self.salesforce_location.and_then(|l| l.url))
            .or_else(|| self.share_point_location.and_then(|l| l.url))
    }
}

#[derive(Deserialize)]
struct S3Location {
    uri: Option<String>,
}

#[derive(Deserialize)]
struct UrlLocation {
    url: Option<String>,
}
