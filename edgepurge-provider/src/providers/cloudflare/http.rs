//! Cloudflare HTTP request methods

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{PurgeError, Result};
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ErrorMapper, RawApiError};

use super::{CloudflareClient, CloudflareResponse, MAX_PAGE_SIZE_ZONES};

impl CloudflareClient {
    /// Send one request and unwrap the Cloudflare envelope.
    ///
    /// Any status outside 2xx and any `success: false` body become an error.
    pub(crate) async fn send<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        context: ErrorContext,
    ) -> Result<CloudflareResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{path}", self.base_url);
        let mut request = self
            .client
            .request(method.clone(), &url)
            .header("X-Auth-Key", &self.credentials.api_key)
            .header("X-Auth-Email", &self.credentials.email);

        if let Some(body) = body {
            let body_json =
                serde_json::to_value(body).map_err(|e| PurgeError::SerializationError {
                    provider: self.provider_name().to_string(),
                    detail: e.to_string(),
                })?;
            log::debug!("[cloudflare] Request Body: {body_json}");
            request = request.json(&body_json);
        }

        let (status, response_text) =
            HttpUtils::execute_request(request, self.provider_name(), method.as_str(), path)
                .await?;

        if !HttpUtils::is_success(status) {
            let error = self.status_error(status, &response_text, context);
            log::debug!("[cloudflare] {method} {path} failed: {error}");
            return Err(error);
        }

        let cf_response: CloudflareResponse<T> =
            HttpUtils::parse_json(&response_text, self.provider_name())?;

        if !cf_response.success {
            let raw = match cf_response.first_error() {
                Some((code, message)) => RawApiError::with_code(code, message),
                None => RawApiError::new("Unknown error"),
            };
            return Err(self.map_error(raw.with_status(status), context));
        }

        Ok(cf_response)
    }

    /// Translate a non-2xx response, using the body's error list when present.
    fn status_error(&self, status: u16, response_text: &str, context: ErrorContext) -> PurgeError {
        let parsed: Option<CloudflareResponse<serde_json::Value>> =
            serde_json::from_str(response_text).ok();
        let raw = match parsed.as_ref().and_then(CloudflareResponse::first_error) {
            Some((code, message)) => RawApiError::with_code(code, message),
            None if response_text.trim().is_empty() => {
                RawApiError::new(format!("HTTP {status} with empty body"))
            }
            None => RawApiError::new(crate::utils::log_sanitizer::truncate_for_log(
                response_text,
            )),
        };
        self.map_error(raw.with_status(status), context)
    }

    /// Execute a GET request and return `result`
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        context: ErrorContext,
    ) -> Result<T> {
        self.send::<T, ()>(Method::GET, path, None, context)
            .await?
            .result
            .ok_or_else(|| self.parse_error("Missing result field in response"))
    }

    /// Execute GET against every page of a listing endpoint
    pub(crate) async fn get_all_pages<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page = 1_u32;

        loop {
            let paged = format!("{path}?page={page}&per_page={MAX_PAGE_SIZE_ZONES}");
            let response = self
                .send::<Vec<T>, ()>(Method::GET, &paged, None, ErrorContext::default())
                .await?;
            let batch = response.result.unwrap_or_default();
            let fetched = batch.len();
            items.extend(batch);

            let more = match response.result_info {
                Some(info) => match info.total_pages {
                    Some(total_pages) => info.page < total_pages,
                    None => items.len() < info.total_count as usize,
                },
                None => false,
            };
            if !more || fetched == 0 {
                break;
            }
            page += 1;
        }

        Ok(items)
    }

    /// Execute a PATCH request and return `result`
    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        context: ErrorContext,
    ) -> Result<T> {
        self.send::<T, B>(Method::PATCH, path, Some(body), context)
            .await?
            .result
            .ok_or_else(|| self.parse_error("Missing result field in response"))
    }

    /// Execute a DELETE request with a JSON body, discarding `result`
    pub(crate) async fn delete_with_body<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        context: ErrorContext,
    ) -> Result<()> {
        self.send::<serde_json::Value, B>(Method::DELETE, path, Some(body), context)
            .await?;
        Ok(())
    }
}
