//! The output collaborator contract and an in-memory implementation.

use std::collections::BTreeMap;

/// The external collaborator that receives rendered output.
///
/// This is the engine's entire view of the hosting environment: an
/// ordered text sink plus three named key→string stores, consulted only
/// by the `*paramGet/Set/Del` builtin family. The engine performs no
/// locking; callers invoking runs concurrently over a shared sink must
/// serialize access themselves.
pub trait Sink {
    /// Ordered, buffered append of rendered text.
    fn write(&mut self, text: &str);

    /// Record the MIME type of the rendered output.
    fn set_mime_type(&mut self, mime_type: &str);

    /// Read a request parameter (read-only store).
    fn request_param(&self, name: &str) -> Option<String>;

    /// Read a persistent parameter.
    fn persistent_param(&self, name: &str) -> Option<String>;

    /// Write a persistent parameter.
    fn set_persistent_param(&mut self, name: &str, value: &str);

    /// Delete a persistent parameter.
    fn delete_persistent_param(&mut self, name: &str);

    /// Read a temporary parameter.
    fn temporary_param(&self, name: &str) -> Option<String>;

    /// Write a temporary parameter.
    fn set_temporary_param(&mut self, name: &str, value: &str);

    /// Delete a temporary parameter.
    fn delete_temporary_param(&mut self, name: &str);
}

/// An in-memory [`Sink`] for tests and embedding.
#[derive(Debug, Default)]
pub struct BufferSink {
    output: String,
    mime_type: Option<String>,
    request: BTreeMap<String, String>,
    persistent: BTreeMap<String, String>,
    temporary: BTreeMap<String, String>,
}

impl BufferSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink pre-seeded with request parameters.
    pub fn with_request_params<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            request: params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            ..Self::default()
        }
    }

    /// Everything written so far.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// The MIME type set by `@setMimeType`, if any.
    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }
}

impl Sink for BufferSink {
    fn write(&mut self, text: &str) {
        self.output.push_str(text);
    }

    fn set_mime_type(&mut self, mime_type: &str) {
        self.mime_type = Some(mime_type.to_string());
    }

    fn request_param(&self, name: &str) -> Option<String> {
        self.request.get(name).cloned()
    }

    fn persistent_param(&self, name: &str) -> Option<String> {
        self.persistent.get(name).cloned()
    }

    fn set_persistent_param(&mut self, name: &str, value: &str) {
        self.persistent.insert(name.to_string(), value.to_string());
    }

    fn delete_persistent_param(&mut self, name: &str) {
        self.persistent.remove(name);
    }

    fn temporary_param(&self, name: &str) -> Option<String> {
        self.temporary.get(name).cloned()
    }

    fn set_temporary_param(&mut self, name: &str, value: &str) {
        self.temporary.insert(name.to_string(), value.to_string());
    }

    fn delete_temporary_param(&mut self, name: &str) {
        self.temporary.remove(name);
    }
}
