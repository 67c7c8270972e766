use serde_json::Value;

/// Provider header code meaning the installed session has expired
pub const SESSION_EXPIRED_CODE: &str = "X201";

/// Classified result of a provider query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Success(Value),
    /// Session expired; the only condition worth a re-login
    AuthExpired(Value),
    BusinessFailure(Value),
}

impl QueryOutcome {
    /// Classify a raw provider response by its body, not its HTTP status.
    ///
    /// A truthy `responseData` is success. Otherwise `headerInfos.code`
    /// of `X201` marks an expired session, and anything else is a failure.
    pub fn classify(response: Value) -> Self {
        if response.get("responseData").is_some_and(is_truthy) {
            return QueryOutcome::Success(response);
        }
        let code = response
            .pointer("/headerInfos/code")
            .and_then(Value::as_str);
        if code == Some(SESSION_EXPIRED_CODE) {
            QueryOutcome::AuthExpired(response)
        } else {
            QueryOutcome::BusinessFailure(response)
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, QueryOutcome::Success(_))
    }

    pub fn payload(&self) -> &Value {
        match self {
            QueryOutcome::Success(p) | QueryOutcome::AuthExpired(p) | QueryOutcome::BusinessFailure(p) => p,
        }
    }

    pub fn into_payload(self) -> Value {
        match self {
            QueryOutcome::Success(p) | QueryOutcome::AuthExpired(p) | QueryOutcome::BusinessFailure(p) => p,
        }
    }
}

/// Null, false, zero and empty containers/strings are falsy
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
