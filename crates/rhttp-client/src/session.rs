use std::io::{self, Read, Write};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use rhttp_core::kv::OrderedKeyValueSet;

use crate::model::{
    Counters, HttpMethod, ProtocolVersion, RequestModel, ResponseSnapshot, Scheme,
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("malformed session: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unknown method {0:?} in session")]
    InvalidMethod(String),

    #[error("unknown scheme {0:?} in session")]
    InvalidScheme(String),

    #[error("unknown protocol {0:?} in session")]
    InvalidProtocol(String),
}

/// `null` and missing values both decode to the type's default.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// On-disk request view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestRecord {
    #[serde(deserialize_with = "nullable")]
    pub host: String,
    #[serde(deserialize_with = "nullable")]
    pub scheme: String,
    #[serde(deserialize_with = "nullable")]
    pub method: String,
    /// Request path.
    #[serde(deserialize_with = "nullable")]
    pub url: String,
    #[serde(deserialize_with = "nullable")]
    pub headers: OrderedKeyValueSet,
    #[serde(deserialize_with = "nullable")]
    pub form: OrderedKeyValueSet,
    /// Raw query string.
    #[serde(deserialize_with = "nullable")]
    pub qs: String,
    #[serde(deserialize_with = "nullable", skip_serializing_if = "OrderedKeyValueSet::is_empty")]
    pub cookies: OrderedKeyValueSet,
    #[serde(deserialize_with = "nullable", skip_serializing_if = "String::is_empty")]
    pub proto: String,
}

/// On-disk response view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseRecord {
    #[serde(deserialize_with = "nullable")]
    pub status: String,
    #[serde(deserialize_with = "nullable")]
    pub proto: String,
    #[serde(deserialize_with = "nullable")]
    pub headers: OrderedKeyValueSet,
    #[serde(deserialize_with = "nullable")]
    pub body: Vec<String>,
}

/// Saved request, response and counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    #[serde(rename = "reqCount", deserialize_with = "nullable")]
    pub req_count: u64,
    #[serde(rename = "resTime", deserialize_with = "nullable")]
    pub res_time: String,
    #[serde(deserialize_with = "nullable")]
    pub req: RequestRecord,
    #[serde(deserialize_with = "nullable")]
    pub res: ResponseRecord,
}

impl Session {
    pub fn snapshot(
        model: &RequestModel,
        response: Option<&ResponseSnapshot>,
        counters: &Counters,
    ) -> Self {
        let req = RequestRecord {
            host: model.host.clone(),
            scheme: model.scheme.as_str().to_string(),
            method: model.method.as_str().to_string(),
            url: model.path.clone(),
            headers: model.headers.clone(),
            form: model.form.clone(),
            qs: model.raw_query.clone(),
            cookies: model.cookies.clone(),
            proto: model.protocol.label().to_string(),
        };
        let res = response
            .map(|r| ResponseRecord {
                status: r.status.clone(),
                proto: r.proto.clone(),
                headers: r.headers.clone(),
                body: r.body_lines.clone(),
            })
            .unwrap_or_default();
        Self {
            req_count: counters.request_count,
            res_time: counters.latency.clone(),
            req,
            res,
        }
    }

    pub fn save<W: Write>(&self, mut writer: W) -> Result<(), SessionError> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    pub fn load<R: Read>(reader: R) -> Result<Self, SessionError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Split into live state. Fails without side effects when a field
    /// names an unknown method, scheme or protocol.
    pub fn into_parts(
        self,
    ) -> Result<(RequestModel, Option<ResponseSnapshot>, Counters), SessionError> {
        let req = self.req;

        let method = if req.method.is_empty() {
            HttpMethod::Get
        } else {
            HttpMethod::from_name(&req.method)
                .ok_or_else(|| SessionError::InvalidMethod(req.method.clone()))?
        };
        let scheme = if req.scheme.is_empty() {
            Scheme::Http
        } else {
            Scheme::from_name(&req.scheme)
                .ok_or_else(|| SessionError::InvalidScheme(req.scheme.clone()))?
        };
        let protocol = if req.proto.is_empty() {
            ProtocolVersion::Http11
        } else {
            ProtocolVersion::from_label(&req.proto)
                .ok_or_else(|| SessionError::InvalidProtocol(req.proto.clone()))?
        };

        let model = RequestModel {
            method,
            scheme,
            host: req.host,
            path: req.url,
            raw_query: req.qs,
            headers: req.headers,
            cookies: req.cookies,
            form: req.form,
            protocol,
        };

        let response = ResponseSnapshot {
            status: self.res.status,
            proto: self.res.proto,
            headers: self.res.headers,
            body_lines: self.res.body,
        };
        let response = (!response.is_empty()).then_some(response);

        let counters = Counters {
            request_count: self.req_count,
            latency: self.res_time,
        };

        Ok((model, response, counters))
    }
}
