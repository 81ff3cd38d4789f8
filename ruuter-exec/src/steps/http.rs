use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use ruuter_core::types::{HttpMethod, Mapping, StepDef};
use serde_json::{json, Value};

use crate::context::Context;
use crate::eval::eval_value;
use crate::failure::Failure;
use crate::http::{HttpClient, HttpError, HttpRequestParts, HttpResponseParts};
use crate::retry::{decide_retry, AttemptOutcome, RetryConfig, RetryDecision};
use crate::step::{ControlSignal, Step};

#[derive(Debug, Clone)]
pub struct HttpStepConfig {
    pub timeout: Duration,
    pub max_response_bytes: usize,
    pub retry: RetryConfig,
}

impl Default for HttpStepConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_response_bytes: 10 * 1024 * 1024,
            retry: RetryConfig::default(),
        }
    }
}

/// `http.<method>` with `args: {url, headers?, query?, body?}` and optional `result`.
///
/// Stores `{response: {status, headers, body}}` under `result`. Non-2xx statuses are
/// not failures; only transport errors and undecodable JSON bodies are.
pub struct HttpStep {
    method: HttpMethod,
    args: Value,
    result: Option<String>,
    client: Arc<dyn HttpClient>,
    config: HttpStepConfig,
}

impl HttpStep {
    pub fn new(
        method: HttpMethod,
        args: Value,
        result: Option<String>,
        client: Arc<dyn HttpClient>,
        config: HttpStepConfig,
    ) -> Self {
        Self {
            method,
            args,
            result,
            client,
            config,
        }
    }

    pub fn from_def(
        def: &StepDef,
        method: HttpMethod,
        client: Arc<dyn HttpClient>,
        config: HttpStepConfig,
    ) -> Result<Arc<dyn Step>, String> {
        let Some(args) = def.param("args").filter(|a| a.is_object()) else {
            return Err("`args` must be a mapping".to_string());
        };
        if args.get("url").is_none() {
            return Err("`args.url` is required".to_string());
        }
        let result = match def.param("result") {
            None => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => return Err("`result` must be a variable name".to_string()),
        };
        Ok(Arc::new(Self::new(method, args.clone(), result, client, config)))
    }

    fn build_request(&self, args: &Value) -> Result<HttpRequestParts, Failure> {
        let raw_url = args
            .get("url")
            .and_then(Value::as_str)
            .ok_or_else(|| Failure::other("`args.url` did not evaluate to a string"))?;
        let mut url = url::Url::parse(raw_url)
            .map_err(|e| Failure::other(format!("invalid url `{raw_url}`: {e}")))?;

        match args.get("query") {
            Some(Value::Object(query)) if !query.is_empty() => {
                let mut pairs = url.query_pairs_mut();
                for (k, v) in query {
                    pairs.append_pair(k, &scalar_text(v));
                }
            }
            _ => {}
        }

        let mut headers = BTreeMap::new();
        if let Some(Value::Object(h)) = args.get("headers") {
            for (k, v) in h {
                headers.insert(k.clone(), scalar_text(v));
            }
        }

        let body = match args.get("body") {
            None | Some(Value::Null) => Vec::new(),
            Some(body) => {
                if !headers.keys().any(|k| k.eq_ignore_ascii_case("content-type")) {
                    headers.insert("content-type".to_string(), "application/json".to_string());
                }
                serde_json::to_vec(body).map_err(|e| Failure::other(e.to_string()))?
            }
        };

        Ok(HttpRequestParts {
            method: self.method.as_str().to_string(),
            url,
            headers,
            body,
        })
    }

    fn may_retry(&self) -> bool {
        let idempotent = !matches!(self.method, HttpMethod::Post | HttpMethod::Patch);
        idempotent || self.config.retry.retry_non_idempotent
    }

    async fn send_with_retry(&self, req: HttpRequestParts) -> Result<HttpResponseParts, HttpError> {
        if !self.may_retry() {
            return self
                .client
                .send(req, self.config.timeout, self.config.max_response_bytes)
                .await;
        }
        let mut attempt_no = 1usize;
        loop {
            let sent = self
                .client
                .send(req.clone(), self.config.timeout, self.config.max_response_bytes)
                .await;
            if matches!(&sent, Err(e) if !matches!(e, HttpError::Timeout | HttpError::Network(_))) {
                return sent;
            }
            let outcome = match &sent {
                Ok(resp) => AttemptOutcome::Status {
                    status: resp.status,
                    headers: &resp.headers,
                },
                Err(_) => AttemptOutcome::NetworkFailure,
            };
            let decision = decide_retry(
                &self.config.retry,
                attempt_no,
                outcome,
                SystemTime::now(),
                || fastrand::u64(..),
            );
            match decision {
                RetryDecision::Stop { .. } => return sent,
                RetryDecision::RetryAfter { delay, reason } => {
                    tracing::debug!(
                        url = %req.url,
                        attempt_no,
                        ?delay,
                        ?reason,
                        "retrying http call"
                    );
                    tokio::time::sleep(delay).await;
                    attempt_no += 1;
                }
            }
        }
    }
}

#[async_trait]
impl Step for HttpStep {
    async fn execute(&self, mut ctx: Context) -> Result<ControlSignal, Failure> {
        let args = eval_value(&self.args, &ctx)?;
        let req = self.build_request(&args)?;
        let resp = self.send_with_retry(req).await?;
        let response = response_value(&resp)?;

        if let Some(var) = &self.result {
            ctx.set(var.clone(), json!({ "response": response }));
        }
        Ok(ControlSignal::Continue(ctx))
    }

    fn is_network_bound(&self) -> bool {
        true
    }
}

fn response_value(resp: &HttpResponseParts) -> Result<Value, Failure> {
    let is_json = resp
        .header("content-type")
        .is_some_and(|ct| ct.to_ascii_lowercase().contains("json"));

    let body = if resp.body.is_empty() {
        Value::Null
    } else if is_json {
        serde_json::from_slice(&resp.body)
            .map_err(|e| Failure::from(HttpError::Malformed(format!("invalid JSON body: {e}"))))?
    } else {
        Value::String(String::from_utf8_lossy(&resp.body).into_owned())
    };

    let headers: Mapping = resp
        .headers
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();

    Ok(json!({
        "status": resp.status,
        "headers": headers,
        "body": body,
    }))
}

fn scalar_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
