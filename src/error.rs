use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt;

/// HTTP method type, re-exported for use with error inspection.
pub use reqwest::Method;
/// HTTP status code type, re-exported for use with error inspection.
pub use reqwest::StatusCode;

use crate::types::NaiveDate;

#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Error related to non-successful HTTP call
    Status,
    /// Error related to invalid configuration or input
    Validation,
    /// Internal error from dependencies
    Internal,
    /// Error related to WebSocket connections
    WebSocket,
    /// The exchange rate service answered but refused the lookup
    Lookup,
    /// A conversion request payload could not be interpreted
    Conversion,
}

#[derive(Debug)]
pub struct Error {
    kind: Kind,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    backtrace: Backtrace,
}

impl Error {
    pub fn with_source<S: StdError + Send + Sync + 'static>(kind: Kind, source: S) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
            backtrace: Backtrace::capture(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    #[must_use]
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    #[must_use]
    pub fn inner(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    #[must_use]
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        let e = self.source.as_deref()?;
        e.downcast_ref::<E>()
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Validation {
            reason: message.into(),
        }
        .into()
    }

    pub fn status<S: Into<String>>(
        status_code: StatusCode,
        method: Method,
        path: String,
        message: S,
    ) -> Self {
        Status {
            status_code,
            method,
            path,
            message: message.into(),
        }
        .into()
    }

    pub fn lookup<S: Into<String>>(from: &str, to: &str, date: NaiveDate, reason: S) -> Self {
        Lookup {
            from: from.to_owned(),
            to: to.to_owned(),
            date,
            reason: reason.into(),
        }
        .into()
    }

    pub fn conversion<S: Into<String>>(reason: S) -> Self {
        Conversion {
            reason: reason.into(),
        }
        .into()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(src) => write!(f, "{:?}: {}", self.kind, src),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

#[non_exhaustive]
#[derive(Debug)]
pub struct Status {
    pub status_code: StatusCode,
    pub method: Method,
    pub path: String,
    pub message: String,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "error({}) making {} call to {} with {}",
            self.status_code, self.method, self.path, self.message
        )
    }
}

impl StdError for Status {}

#[non_exhaustive]
#[derive(Debug)]
pub struct Validation {
    pub reason: String,
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid: {}", self.reason)
    }
}

impl StdError for Validation {}

/// The rate service rejected a lookup for a currency pair.
#[non_exhaustive]
#[derive(Debug)]
pub struct Lookup {
    pub from: String,
    pub to: String,
    pub date: NaiveDate,
    pub reason: String,
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to fetch exchange rate {}->{} on {}: {}",
            self.from, self.to, self.date, self.reason
        )
    }
}

impl StdError for Lookup {}

#[non_exhaustive]
#[derive(Debug)]
pub struct Conversion {
    pub reason: String,
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed conversion request: {}", self.reason)
    }
}

impl StdError for Conversion {}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::with_source(Kind::Internal, e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::with_source(Kind::Validation, e)
    }
}

impl From<Validation> for Error {
    fn from(err: Validation) -> Self {
        Error::with_source(Kind::Validation, err)
    }
}

impl From<Status> for Error {
    fn from(err: Status) -> Self {
        Error::with_source(Kind::Status, err)
    }
}

impl From<Lookup> for Error {
    fn from(err: Lookup) -> Self {
        Error::with_source(Kind::Lookup, err)
    }
}

impl From<Conversion> for Error {
    fn from(err: Conversion) -> Self {
        Error::with_source(Kind::Conversion, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_display_should_name_pair_and_day() {
        let date = NaiveDate::from_ymd_opt(2021, 5, 18).unwrap();
        let error = Error::lookup("USD", "EUR", date, "invalid_currency_codes");

        assert_eq!(error.kind(), Kind::Lookup);
        assert_eq!(
            error.to_string(),
            "Lookup: failed to fetch exchange rate USD->EUR on 2021-05-18: invalid_currency_codes"
        );
    }

    #[test]
    fn conversion_into_error_should_succeed() {
        let error: Error = Conversion {
            reason: "missing field `currency`".to_owned(),
        }
        .into();

        assert_eq!(error.kind(), Kind::Conversion);
        assert!(error.to_string().contains("`currency`"));
        assert!(error.downcast_ref::<Conversion>().is_some());
    }
}
