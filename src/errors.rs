use std::fmt;
use std::time::Duration;

/// Failure to resolve a single profile field.
///
/// These never escape the extractor: each one is logged and the field is
/// left absent.
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    #[error("no element matches selector: {0}")]
    NotFound(String),

    #[error("element matching '{selector}' did not appear within {waited:?}")]
    Timeout { selector: String, waited: Duration },

    #[error("could not parse {input:?}: {reason}")]
    Parse { input: String, reason: String },

    #[error("webdriver command failed: {0}")]
    Driver(String),
}

impl FieldError {
    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        FieldError::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// The page could not be obtained at all. Fatal to one extraction call.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to connect to WebDriver at {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("failed to start a browser session: {0}")]
    Session(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("loading {url} timed out after {waited:?}")]
    Timeout { url: String, waited: Duration },
}

/// Process-level error carrying an exit code
#[derive(Debug)]
pub enum ProbeError {
    /// Bad command line input (exit code 2)
    InvalidInput(String),
    /// WebDriver could not be reached or started (exit code 4)
    WebDriverFailed(String),
    /// Operation timeout (exit code 5)
    Timeout(String),
    /// Generic error (exit code 1)
    Other(anyhow::Error),
}

impl ProbeError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ProbeError::InvalidInput(_) => 2,
            ProbeError::WebDriverFailed(_) => 4,
            ProbeError::Timeout(_) => 5,
            ProbeError::Other(_) => 1,
        }
    }
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ProbeError::WebDriverFailed(msg) => write!(f, "WebDriver failed: {}", msg),
            ProbeError::Timeout(msg) => write!(f, "Operation timed out: {}", msg),
            ProbeError::Other(err) => write!(f, "{:#}", err),
        }
    }
}

impl std::error::Error for ProbeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProbeError::Other(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for ProbeError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(load) = err.downcast_ref::<LoadError>() {
            return match load {
                LoadError::Timeout { .. } => ProbeError::Timeout(load.to_string()),
                _ => ProbeError::WebDriverFailed(load.to_string()),
            };
        }

        if err.downcast_ref::<url::ParseError>().is_some()
            || err.downcast_ref::<std::net::AddrParseError>().is_some()
        {
            return ProbeError::InvalidInput(format!("{:#}", err));
        }

        let msg = err.to_string();
        if msg.contains("geckodriver") || msg.contains("chromedriver") {
            ProbeError::WebDriverFailed(msg)
        } else if msg.contains("timed out") {
            ProbeError::Timeout(msg)
        } else {
            ProbeError::Other(err)
        }
    }
}
