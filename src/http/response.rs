//! Outbound response representation.

/// The response object injected into handler methods.
///
/// Handlers mutate status and body through their response parameter; the
/// dispatcher fills the body from the handler's return value when nothing
/// was written explicitly.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: u16,
    body: String,
}

impl HttpResponse {
    pub fn new() -> Self {
        Self {
            status: 200,
            body: String::new(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    pub fn into_body(self) -> String {
        self.body
    }
}

impl Default for HttpResponse {
    fn default() -> Self {
        Self::new()
    }
}
