//! The three-stage response decoding pipeline.
//!
//! [`Pipeline`] holds everything needed to decode one kind of response: a
//! parser, a constructor and the three stage interceptors. A decode call runs
//!
//! ```text
//! (bytes, metadata)
//!   → intercept_bytes     (default: AcceptStatus, 2xx only)
//!   → parser.parse        (ParseError)
//!   → intercept_parsed    (default: PassThrough)
//!   → construct           (ConstructionError)
//!   → intercept_instance  (default: PassThrough)
//!   → (instance, metadata)
//! ```
//!
//! and stops at the first failure. Each step receives the metadata returned by
//! the previous one.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::{debug, debug_span, trace};

use crate::{
    AcceptStatus, ConstructionError, DataParser, DecodeError, Interceptor, JsonParser,
    PassThrough, ResponseMetadata, Result,
};

#[cfg(feature = "metrics")]
const METRIC_DECODE_TOTAL: &str = "decant_decode_total";
#[cfg(feature = "metrics")]
const LABEL_OUTCOME: &str = "outcome";

type ConstructFn<Parsed, I> =
    dyn Fn(Parsed, &ResponseMetadata) -> std::result::Result<I, ConstructionError> + Send + Sync;

/// Decoding pipeline for one response type.
///
/// Pipelines are stateless and cheap to clone; define one per response type
/// and share it.
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use decant_core::{Pipeline, ResponseMetadata};
///
/// #[derive(Debug, PartialEq, serde::Deserialize)]
/// struct User {
///     id: u64,
///     name: String,
/// }
///
/// let pipeline = Pipeline::<_, User>::json();
/// let (user, _metadata) = pipeline
///     .decode(Bytes::from(r#"{"id":1,"name":"a"}"#), ResponseMetadata::new(200))
///     .expect("decode");
/// assert_eq!(user, User { id: 1, name: "a".to_string() });
///
/// let err = pipeline
///     .decode(Bytes::new(), ResponseMetadata::new(404))
///     .expect_err("not found");
/// assert_eq!(err.status(), Some(404));
/// ```
pub struct Pipeline<P: DataParser, I> {
    parser: Arc<P>,
    construct: Arc<ConstructFn<P::Parsed, I>>,
    bytes: Arc<dyn Interceptor<Bytes>>,
    parsed: Arc<dyn Interceptor<P::Parsed>>,
    instance: Arc<dyn Interceptor<I>>,
}

impl<P: DataParser, I> Clone for Pipeline<P, I> {
    fn clone(&self) -> Self {
        Self {
            parser: Arc::clone(&self.parser),
            construct: Arc::clone(&self.construct),
            bytes: Arc::clone(&self.bytes),
            parsed: Arc::clone(&self.parsed),
            instance: Arc::clone(&self.instance),
        }
    }
}

impl<P: DataParser + fmt::Debug, I> fmt::Debug for Pipeline<P, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("parser", &self.parser)
            .field("instance", &std::any::type_name::<I>())
            .finish_non_exhaustive()
    }
}

impl<P, I> Pipeline<P, I>
where
    P: DataParser,
    P::Parsed: 'static,
    I: 'static,
{
    /// Create a pipeline builder from a parser and a constructor.
    ///
    /// The constructor must be a pure function of the parsed value and the
    /// metadata.
    #[must_use]
    pub fn builder<F>(parser: P, construct: F) -> PipelineBuilder<P, I>
    where
        F: Fn(P::Parsed, &ResponseMetadata) -> std::result::Result<I, ConstructionError>
            + Send
            + Sync
            + 'static,
    {
        PipelineBuilder {
            parser,
            construct: Arc::new(construct),
            bytes: None,
            parsed: None,
            instance: None,
        }
    }

    /// Create a pipeline with default interceptors.
    #[must_use]
    pub fn new<F>(parser: P, construct: F) -> Self
    where
        F: Fn(P::Parsed, &ResponseMetadata) -> std::result::Result<I, ConstructionError>
            + Send
            + Sync
            + 'static,
    {
        Self::builder(parser, construct).build()
    }
}

impl<I> Pipeline<JsonParser, I>
where
    I: DeserializeOwned + 'static,
{
    /// JSON pipeline building `I` with serde, with default interceptors.
    #[must_use]
    pub fn json() -> Self {
        Self::json_builder().build()
    }

    /// Builder for a JSON pipeline building `I` with serde.
    ///
    /// Deserialization failures become [`ConstructionError::Deserialize`]
    /// with the path of the offending field.
    #[must_use]
    pub fn json_builder() -> PipelineBuilder<JsonParser, I> {
        Self::builder(JsonParser, from_json_value)
    }
}

fn from_json_value<I: DeserializeOwned>(
    value: serde_json::Value,
    _metadata: &ResponseMetadata,
) -> std::result::Result<I, ConstructionError> {
    serde_path_to_error::deserialize(value).map_err(|e| ConstructionError::Deserialize {
        path: e.path().to_string(),
        message: e.inner().to_string(),
    })
}

impl<P: DataParser, I> Pipeline<P, I> {
    /// The parser used for the body.
    #[must_use]
    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// MIME type the parser expects, for an `Accept` request header.
    #[must_use]
    pub fn accept(&self) -> Option<&str> {
        self.parser.content_type()
    }

    /// Run the bytes stage alone.
    pub fn intercept_bytes(
        &self,
        body: Bytes,
        metadata: ResponseMetadata,
    ) -> Result<(Bytes, ResponseMetadata)> {
        self.bytes.intercept(body, metadata)
    }

    /// Run the parsed stage alone.
    pub fn intercept_parsed(
        &self,
        parsed: P::Parsed,
        metadata: ResponseMetadata,
    ) -> Result<(P::Parsed, ResponseMetadata)> {
        self.parsed.intercept(parsed, metadata)
    }

    /// Build the typed instance alone.
    pub fn construct(
        &self,
        parsed: P::Parsed,
        metadata: &ResponseMetadata,
    ) -> std::result::Result<I, ConstructionError> {
        (self.construct)(parsed, metadata)
    }

    /// Run the instance stage alone.
    pub fn intercept_instance(
        &self,
        instance: I,
        metadata: ResponseMetadata,
    ) -> Result<(I, ResponseMetadata)> {
        self.instance.intercept(instance, metadata)
    }

    /// Decode one response.
    ///
    /// Returns the typed instance along with the metadata as rewritten by
    /// the interceptors.
    pub fn decode(&self, body: Bytes, metadata: ResponseMetadata) -> Result<(I, ResponseMetadata)> {
        let span = debug_span!("decode", status = metadata.status(), body_len = body.len());
        let _enter = span.enter();

        let result = match self.run(body, metadata) {
            Ok((instance, metadata)) => {
                trace!(status = metadata.status(), "response decoded");
                Ok((instance, metadata))
            }
            Err((stage, err)) => {
                debug!(stage, kind = %err.kind(), error = %err, "response decoding failed");
                Err(err)
            }
        };

        #[cfg(feature = "metrics")]
        record_outcome(&result);

        result
    }

    /// Decode one response, keeping only the typed instance.
    pub fn decode_value(&self, body: Bytes, metadata: ResponseMetadata) -> Result<I> {
        self.decode(body, metadata).map(|(instance, _)| instance)
    }

    /// Decode a buffered [`http::Response`].
    pub fn decode_response(&self, response: http::Response<Bytes>) -> Result<(I, ResponseMetadata)> {
        let (parts, body) = response.into_parts();
        self.decode(body, parts.into())
    }

    /// Run every step, tagging a failure with the step that raised it.
    fn run(
        &self,
        body: Bytes,
        metadata: ResponseMetadata,
    ) -> std::result::Result<(I, ResponseMetadata), (&'static str, DecodeError)> {
        let (body, metadata) = self
            .intercept_bytes(body, metadata)
            .map_err(|err| ("bytes", err))?;

        let parsed = self
            .parser
            .parse(&body)
            .map_err(|err| ("parse", DecodeError::from(err)))?;

        let (parsed, metadata) = self
            .intercept_parsed(parsed, metadata)
            .map_err(|err| ("parsed", err))?;

        let instance = self
            .construct(parsed, &metadata)
            .map_err(|err| ("construct", DecodeError::from(err)))?;

        self.intercept_instance(instance, metadata)
            .map_err(|err| ("instance", err))
    }
}

#[cfg(feature = "metrics")]
fn record_outcome<T>(result: &Result<T>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(err) => err.kind().as_str(),
    };
    metrics::counter!(METRIC_DECODE_TOTAL, LABEL_OUTCOME => outcome).increment(1);
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`Pipeline`].
///
/// Stages left unset use [`AcceptStatus`] (bytes) and [`PassThrough`]
/// (parsed, instance). Setting a stage replaces its default entirely.
pub struct PipelineBuilder<P: DataParser, I> {
    parser: P,
    construct: Arc<ConstructFn<P::Parsed, I>>,
    bytes: Option<Arc<dyn Interceptor<Bytes>>>,
    parsed: Option<Arc<dyn Interceptor<P::Parsed>>>,
    instance: Option<Arc<dyn Interceptor<I>>>,
}

impl<P: DataParser + fmt::Debug, I> fmt::Debug for PipelineBuilder<P, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineBuilder")
            .field("parser", &self.parser)
            .field("bytes", &self.bytes.is_some())
            .field("parsed", &self.parsed.is_some())
            .field("instance", &self.instance.is_some())
            .finish_non_exhaustive()
    }
}

impl<P, I> PipelineBuilder<P, I>
where
    P: DataParser,
    P::Parsed: 'static,
    I: 'static,
{
    /// Set the bytes-stage interceptor.
    #[must_use]
    pub fn intercept_bytes(mut self, interceptor: impl Interceptor<Bytes> + 'static) -> Self {
        self.bytes = Some(Arc::new(interceptor));
        self
    }

    /// Set the parsed-stage interceptor.
    #[must_use]
    pub fn intercept_parsed(mut self, interceptor: impl Interceptor<P::Parsed> + 'static) -> Self {
        self.parsed = Some(Arc::new(interceptor));
        self
    }

    /// Set the instance-stage interceptor.
    #[must_use]
    pub fn intercept_instance(mut self, interceptor: impl Interceptor<I> + 'static) -> Self {
        self.instance = Some(Arc::new(interceptor));
        self
    }

    /// Build the pipeline.
    #[must_use]
    pub fn build(self) -> Pipeline<P, I> {
        Pipeline {
            parser: Arc::new(self.parser),
            construct: self.construct,
            bytes: self
                .bytes
                .unwrap_or_else(|| Arc::new(AcceptStatus::default())),
            parsed: self.parsed.unwrap_or_else(|| Arc::new(PassThrough)),
            instance: self.instance.unwrap_or_else(|| Arc::new(PassThrough)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use assert2::{check, let_assert};
    use http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
    use serde_json::Value;

    use super::*;
    use crate::{ParseError, StringParser, ValidationError};

    #[derive(Debug, Clone, PartialEq, serde::Deserialize)]
    struct User {
        id: u64,
        name: String,
    }

    fn ok_metadata() -> ResponseMetadata {
        ResponseMetadata::new(200)
            .with_header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
    }

    /// Counts how many times each step ran.
    #[derive(Debug, Default)]
    struct Calls {
        bytes: AtomicUsize,
        parsed: AtomicUsize,
        construct: AtomicUsize,
        instance: AtomicUsize,
    }

    impl Calls {
        fn get(counter: &AtomicUsize) -> usize {
            counter.load(Ordering::SeqCst)
        }
    }

    fn counting_pipeline(calls: &Arc<Calls>) -> Pipeline<JsonParser, User> {
        let on_bytes = Arc::clone(calls);
        let on_parsed = Arc::clone(calls);
        let on_construct = Arc::clone(calls);
        let on_instance = Arc::clone(calls);

        Pipeline::builder(JsonParser, move |value: Value, metadata: &ResponseMetadata| {
            on_construct.construct.fetch_add(1, Ordering::SeqCst);
            from_json_value(value, metadata)
        })
        .intercept_bytes(move |body: Bytes, metadata: ResponseMetadata| {
            on_bytes.bytes.fetch_add(1, Ordering::SeqCst);
            AcceptStatus::default().intercept(body, metadata)
        })
        .intercept_parsed(move |value: Value, metadata: ResponseMetadata| {
            on_parsed.parsed.fetch_add(1, Ordering::SeqCst);
            if let Some(code) = value.get("error").and_then(Value::as_str) {
                return Err(DecodeError::from(ValidationError::api(code, "error envelope")));
            }
            PassThrough.intercept(value, metadata)
        })
        .intercept_instance(move |user: User, metadata: ResponseMetadata| {
            on_instance.instance.fetch_add(1, Ordering::SeqCst);
            PassThrough.intercept(user, metadata)
        })
        .build()
    }

    #[test]
    fn decode_success() {
        let pipeline = Pipeline::<_, User>::json();
        let metadata = ok_metadata();

        let (user, out_metadata) = pipeline
            .decode(Bytes::from(r#"{"id":1,"name":"a"}"#), metadata.clone())
            .expect("decode");

        check!(user == User { id: 1, name: "a".to_string() });
        check!(out_metadata == metadata);
    }

    #[test]
    fn status_failure_short_circuits_everything() {
        let calls = Arc::new(Calls::default());
        let pipeline = counting_pipeline(&calls);

        let result = pipeline.decode(Bytes::from("not json"), ResponseMetadata::new(404));

        let_assert!(Err(DecodeError::UnacceptableStatus(404)) = result);
        check!(Calls::get(&calls.bytes) == 1);
        check!(Calls::get(&calls.parsed) == 0);
        check!(Calls::get(&calls.construct) == 0);
        check!(Calls::get(&calls.instance) == 0);
    }

    #[test]
    fn parse_failure_short_circuits_later_stages() {
        let calls = Arc::new(Calls::default());
        let pipeline = counting_pipeline(&calls);

        let result = pipeline.decode(Bytes::from("not json"), ok_metadata());

        let_assert!(Err(DecodeError::Parse(ParseError::Json { .. })) = result);
        check!(Calls::get(&calls.bytes) == 1);
        check!(Calls::get(&calls.parsed) == 0);
        check!(Calls::get(&calls.construct) == 0);
        check!(Calls::get(&calls.instance) == 0);
    }

    #[test]
    fn parsed_stage_failure_skips_construct_and_instance() {
        let calls = Arc::new(Calls::default());
        let pipeline = counting_pipeline(&calls);

        let result = pipeline.decode(Bytes::from(r#"{"error":"quota"}"#), ok_metadata());

        let_assert!(Err(DecodeError::Validation(ValidationError::Api { code, .. })) = result);
        check!(code == "quota");
        check!(Calls::get(&calls.bytes) == 1);
        check!(Calls::get(&calls.parsed) == 1);
        check!(Calls::get(&calls.construct) == 0);
        check!(Calls::get(&calls.instance) == 0);
    }

    #[test]
    fn construction_failure_skips_instance_stage() {
        let calls = Arc::new(Calls::default());
        let pipeline = counting_pipeline(&calls);

        let result = pipeline.decode(Bytes::from(r#"{"id":1}"#), ok_metadata());

        let_assert!(Err(DecodeError::Construction(ConstructionError::Deserialize { message, .. })) = result);
        check!(message.contains("missing field `name`"));
        check!(Calls::get(&calls.parsed) == 1);
        check!(Calls::get(&calls.construct) == 1);
        check!(Calls::get(&calls.instance) == 0);
    }

    #[test]
    fn every_step_runs_once_on_success() {
        let calls = Arc::new(Calls::default());
        let pipeline = counting_pipeline(&calls);

        pipeline
            .decode(Bytes::from(r#"{"id":1,"name":"a"}"#), ok_metadata())
            .expect("decode");

        check!(Calls::get(&calls.bytes) == 1);
        check!(Calls::get(&calls.parsed) == 1);
        check!(Calls::get(&calls.construct) == 1);
        check!(Calls::get(&calls.instance) == 1);
    }

    #[test]
    fn json_pipeline_rejects_trailing_garbage() {
        let pipeline = Pipeline::<_, User>::json();

        let result = pipeline.decode(Bytes::from(r#"{"id":1,"name":"a"}}}garbage"#), ok_metadata());
        let_assert!(Err(DecodeError::Parse(ParseError::Json { .. })) = result);
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn decode_counts_outcomes() {
        use metrics_util::debugging::{DebugValue, DebuggingRecorder};

        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();
        let pipeline = Pipeline::<_, User>::json();

        metrics::with_local_recorder(&recorder, || {
            pipeline
                .decode(Bytes::from(r#"{"id":1,"name":"a"}"#), ok_metadata())
                .expect("decode");
            for _ in 0..2 {
                let result = pipeline.decode(Bytes::new(), ResponseMetadata::new(404));
                check!(result.is_err());
            }
            let result = pipeline.decode(Bytes::from("{"), ok_metadata());
            check!(result.is_err());
        });

        let mut counts = snapshotter
            .snapshot()
            .into_vec()
            .into_iter()
            .filter(|(key, ..)| key.key().name() == METRIC_DECODE_TOTAL)
            .filter_map(|(key, _, _, value)| {
                let outcome = key
                    .key()
                    .labels()
                    .find(|label| label.key() == LABEL_OUTCOME)?
                    .value()
                    .to_string();
                match value {
                    DebugValue::Counter(count) => Some((outcome, count)),
                    _ => None,
                }
            })
            .collect::<Vec<_>>();
        counts.sort();

        check!(
            counts
                == vec![
                    ("ok".to_string(), 1),
                    ("parse".to_string(), 1),
                    ("unacceptable_status".to_string(), 2),
                ]
        );
    }

    #[test]
    fn rewritten_metadata_flows_forward() {
        let request_id = HeaderName::from_static("x-request-id");
        let tag = request_id.clone();

        let pipeline = Pipeline::<_, User>::json_builder()
            .intercept_bytes(move |body: Bytes, metadata: ResponseMetadata| {
                let metadata = metadata.with_header(tag.clone(), HeaderValue::from_static("r-1"));
                AcceptStatus::default().intercept(body, metadata)
            })
            .intercept_instance(|user: User, metadata: ResponseMetadata| {
                if metadata.header("x-request-id") == Some("r-1") {
                    Ok((user, metadata.with_status(203)))
                } else {
                    Err(DecodeError::rejected("request id not propagated"))
                }
            })
            .build();

        let (_, metadata) = pipeline
            .decode(Bytes::from(r#"{"id":1,"name":"a"}"#), ok_metadata())
            .expect("decode");

        check!(metadata.status() == 203);
        check!(metadata.headers().contains_key(&request_id));
    }

    #[test]
    fn parsed_stage_can_unwrap_envelope() {
        let pipeline = Pipeline::<_, User>::json_builder()
            .intercept_parsed(|value: Value, metadata: ResponseMetadata| match value {
                Value::Object(mut envelope) => match envelope.remove("data") {
                    Some(data) => Ok((data, metadata)),
                    None => Err(DecodeError::from(ValidationError::rejected(
                        "missing `data` envelope",
                    ))),
                },
                _ => Err(DecodeError::rejected("expected an object")),
            })
            .build();

        let user = pipeline
            .decode_value(Bytes::from(r#"{"data":{"id":7,"name":"g"}}"#), ok_metadata())
            .expect("decode");
        check!(user.id == 7);

        let result = pipeline.decode_value(Bytes::from(r#"{"id":7,"name":"g"}"#), ok_metadata());
        let_assert!(Err(DecodeError::Validation(ValidationError::Rejected(reason))) = result);
        check!(reason == "missing `data` envelope");
    }

    #[test]
    fn empty_body_reaches_parser() {
        let pipeline = Pipeline::new(StringParser, |text: String, metadata: &ResponseMetadata| {
            Ok((metadata.status(), text))
        });

        let (value, _) = pipeline
            .decode(Bytes::new(), ResponseMetadata::new(204))
            .expect("decode");
        check!(value == (204, String::new()));
    }

    #[test]
    fn custom_construct_names_missing_field() {
        let pipeline = Pipeline::new(JsonParser, |value: Value, _: &ResponseMetadata| {
            let id = value
                .get("id")
                .and_then(Value::as_u64)
                .ok_or_else(|| ConstructionError::missing_field("id"))?;
            Ok(id)
        });

        let result = pipeline.decode_value(Bytes::from(r#"{"name":"a"}"#), ok_metadata());
        let_assert!(Err(DecodeError::Construction(ConstructionError::MissingField(field))) = result);
        check!(field == "id");
    }

    #[test]
    fn decode_is_repeatable() {
        let pipeline = Pipeline::<_, User>::json();
        let body = Bytes::from(r#"{"id":3,"name":"c"}"#);

        let first = pipeline.decode(body.clone(), ok_metadata()).expect("first");
        let second = pipeline.decode(body, ok_metadata()).expect("second");
        check!(first == second);

        let first = pipeline.decode(Bytes::new(), ResponseMetadata::new(500));
        let second = pipeline.decode(Bytes::new(), ResponseMetadata::new(500));
        check!(first.map_err(|e| e.to_string()) == second.map_err(|e| e.to_string()));
    }

    #[test]
    fn decode_http_response() {
        let response = http::Response::builder()
            .status(201)
            .header("Content-Type", "application/json")
            .body(Bytes::from(r#"{"id":9,"name":"z"}"#))
            .expect("response");

        let (user, metadata) = Pipeline::<_, User>::json()
            .decode_response(response)
            .expect("decode");
        check!(user.id == 9);
        check!(metadata.status() == 201);
    }

    #[test]
    fn accept_comes_from_parser() {
        check!(Pipeline::<_, User>::json().accept() == Some("application/json"));
        check!(Pipeline::<_, User>::json().parser().content_type() == Some("application/json"));
    }

    #[test]
    fn pipeline_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Pipeline<JsonParser, User>>();
    }
}
