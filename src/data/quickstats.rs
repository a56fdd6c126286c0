//! USDA NASS QuickStats API client.

use serde_json::Value;
use tracing::{debug, info};

use crate::config::Config;
use crate::data::transport::{HttpResponse, HttpTransport, Transport};
use crate::domain::{ParamValue, QueryFilter};
use crate::error::AppError;

/// Response format requested from the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Json,
    Csv,
}

impl ResponseFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseFormat::Json => "JSON",
            ResponseFormat::Csv => "CSV",
        }
    }
}

pub struct QuickStatsClient<T = HttpTransport> {
    transport: T,
    api_key: String,
    params_url: String,
    data_url: String,
}

impl QuickStatsClient<HttpTransport> {
    pub fn from_config(config: &Config) -> Self {
        Self::with_transport(config, HttpTransport::new())
    }
}

impl<T: Transport> QuickStatsClient<T> {
    pub fn with_transport(config: &Config, transport: T) -> Self {
        Self {
            transport,
            api_key: config.api_key.clone(),
            params_url: config.params_url.clone(),
            data_url: config.data_url.clone(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Query pairs for a request: key and format first, then the filter.
    ///
    /// Filter entries cannot displace `key`/`format`; they are reserved.
    pub fn build_query(
        &self,
        format: ResponseFormat,
        param: Option<&str>,
        filter: &QueryFilter,
    ) -> Vec<(String, String)> {
        let mut query = vec![
            ("key".to_string(), self.api_key.clone()),
            ("format".to_string(), format.as_str().to_string()),
        ];
        if let Some(param) = param {
            query.push(("param".to_string(), param.to_string()));
        }
        for (k, v) in filter.iter() {
            if matches!(k, "key" | "format" | "param") {
                continue;
            }
            query.push((k.to_string(), v.to_string()));
        }
        query
    }

    /// Valid values of `param` under `filter`.
    ///
    /// An absent key in the response means "no values" and yields an empty list.
    pub fn get_param_values(
        &self,
        param: &str,
        filter: &QueryFilter,
    ) -> Result<Vec<ParamValue>, AppError> {
        let query = self.build_query(ResponseFormat::Json, Some(param), filter);
        let resp = self.send(&self.params_url, &query)?;
        let values = decode_param_values(param, &resp.body)?;
        info!("Found {} values for '{}' with filters: {}", values.len(), param, filter);
        Ok(values)
    }

    /// Like [`get_param_values`](Self::get_param_values) but as strings.
    pub fn get_param_strings(&self, param: &str, filter: &QueryFilter) -> Result<Vec<String>, AppError> {
        Ok(self
            .get_param_values(param, filter)?
            .into_iter()
            .map(|v| v.to_string())
            .collect())
    }

    /// `statisticcat_desc` values available for a commodity.
    pub fn get_statistics(&self, commodity: &str, base: &QueryFilter) -> Result<Vec<String>, AppError> {
        let filter = base.clone().with("commodity_desc", commodity);
        self.get_param_strings("statisticcat_desc", &filter)
    }

    /// `unit_desc` values available for a (commodity, statistic) pair.
    pub fn get_valid_units(
        &self,
        commodity: &str,
        statistic: &str,
        base: &QueryFilter,
    ) -> Result<Vec<String>, AppError> {
        let filter = base
            .clone()
            .with("commodity_desc", commodity)
            .with("statisticcat_desc", statistic);
        self.get_param_strings("unit_desc", &filter)
    }

    /// Raw CSV body from the full-data endpoint.
    pub fn get_data_csv(&self, filter: &QueryFilter) -> Result<String, AppError> {
        let query = self.build_query(ResponseFormat::Csv, None, filter);
        info!("Requesting data from NASS QuickStats API with filters: {}", filter);
        Ok(self.send(&self.data_url, &query)?.body)
    }

    fn send(&self, url: &str, query: &[(String, String)]) -> Result<HttpResponse, AppError> {
        let resp = self.transport.get(url, query)?;
        if !resp.is_success() {
            debug!(status = resp.status, body = %truncate(&resp.body, 200), "non-success response");
            return Err(AppError::request(format!(
                "QuickStats request failed with status {}.",
                resp.status
            )));
        }
        Ok(resp)
    }
}

/// Pull the array under `param` out of a `get_param_values` body.
fn decode_param_values(param: &str, body: &str) -> Result<Vec<ParamValue>, AppError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| AppError::decode(format!("Failed to parse QuickStats response: {e}")))?;

    let Value::Object(mut map) = value else {
        return Err(AppError::decode("QuickStats response is not a JSON object."));
    };

    match map.remove(param) {
        None => Ok(Vec::new()),
        Some(list @ Value::Array(_)) => serde_json::from_value(list).map_err(|e| {
            AppError::decode(format!("Unexpected value list for '{param}': {e}"))
        }),
        Some(_) => Err(AppError::decode(format!(
            "Expected an array under '{param}' in QuickStats response."
        ))),
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::transport::fake::FakeTransport;
    use crate::error::ErrorKind;

    fn client(fake: FakeTransport) -> QuickStatsClient<FakeTransport> {
        QuickStatsClient::with_transport(&Config::new("test-key", "."), fake)
    }

    #[test]
    fn query_always_has_key_and_format() {
        let c = client(FakeTransport::always(HttpResponse::ok("{}")));
        for filter in [
            QueryFilter::new(),
            QueryFilter::new().with("sector_desc", "CROPS"),
            QueryFilter::new().with("key", "spoofed").with("format", "XML"),
        ] {
            let q = c.build_query(ResponseFormat::Json, Some("unit_desc"), &filter);
            let keys: Vec<_> = q.iter().filter(|(k, _)| k == "key").collect();
            let formats: Vec<_> = q.iter().filter(|(k, _)| k == "format").collect();
            assert_eq!(keys, vec![&("key".to_string(), "test-key".to_string())]);
            assert_eq!(formats, vec![&("format".to_string(), "JSON".to_string())]);
        }
    }

    #[test]
    fn param_values_are_extracted() {
        let fake = FakeTransport::always(HttpResponse::ok(r#"{"unit_desc": ["BU / ACRE", "ACRES"]}"#));
        let c = client(fake);
        let filter = QueryFilter::new().with("commodity_desc", "CORN");
        let values = c.get_param_strings("unit_desc", &filter).unwrap();
        assert_eq!(values, vec!["BU / ACRE", "ACRES"]);

        let calls = c.transport().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].url, crate::config::DEFAULT_PARAMS_URL);
        assert_eq!(calls[0].param("param"), Some("unit_desc"));
        assert_eq!(calls[0].param("commodity_desc"), Some("CORN"));
        assert_eq!(calls[0].param("key"), Some("test-key"));
    }

    #[test]
    fn missing_param_key_yields_empty_list() {
        let c = client(FakeTransport::always(HttpResponse::ok(r#"{"other": ["X"]}"#)));
        assert!(c.get_param_values("unit_desc", &QueryFilter::new()).unwrap().is_empty());
    }

    #[test]
    fn year_values_decode_as_ints() {
        let c = client(FakeTransport::always(HttpResponse::ok(r#"{"year": [2022, 2021]}"#)));
        let values = c.get_param_values("year", &QueryFilter::new()).unwrap();
        assert_eq!(values, vec![ParamValue::Int(2022), ParamValue::Int(2021)]);
    }

    #[test]
    fn malformed_body_is_decode_error() {
        let c = client(FakeTransport::always(HttpResponse::ok("<html>oops</html>")));
        let err = c.get_param_values("unit_desc", &QueryFilter::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn wrong_shape_is_decode_error() {
        for body in [r#"["CORN"]"#, r#"{"unit_desc": "ACRES"}"#, r#"{"unit_desc": [{"a": 1}]}"#] {
            let c = client(FakeTransport::always(HttpResponse::ok(body)));
            let err = c.get_param_values("unit_desc", &QueryFilter::new()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Decode, "body: {body}");
        }
    }

    #[test]
    fn non_success_status_is_request_error() {
        let c = client(FakeTransport::always(HttpResponse {
            status: 401,
            body: r#"{"error": ["unauthorized"]}"#.to_string(),
        }));
        let err = c.get_param_values("unit_desc", &QueryFilter::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Request);
        assert!(err.message().contains("401"));
    }

    #[test]
    fn valid_units_binds_commodity_and_statistic() {
        let c = client(FakeTransport::always(HttpResponse::ok(r#"{"unit_desc": ["BU / ACRE"]}"#)));
        let base = QueryFilter::new().with("sector_desc", "CROPS");
        c.get_valid_units("CORN", "YIELD", &base).unwrap();
        let call = &c.transport().calls()[0];
        assert_eq!(call.param("commodity_desc"), Some("CORN"));
        assert_eq!(call.param("statisticcat_desc"), Some("YIELD"));
        assert_eq!(call.param("sector_desc"), Some("CROPS"));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("abc", 10), "abc");
    }
}
