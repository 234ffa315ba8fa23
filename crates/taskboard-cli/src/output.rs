use serde::Serialize;
use taskboard_core::BoardError;

/// Everything the CLI prints is one line of this on stdout (success) or
/// stderr (failure).
#[derive(Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    pub api_version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

/// `kind` lets scripts tell a bad argument from a missing entity or a
/// storage failure without parsing `message`.
#[derive(Serialize, Debug, PartialEq)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub message: String,
}

impl ErrorBody {
    pub fn from_error(err: &anyhow::Error) -> Self {
        let kind = match err.downcast_ref::<BoardError>() {
            Some(BoardError::NotFound(_)) => "not-found",
            Some(BoardError::Validation(_)) => "validation",
            Some(BoardError::Connection(_) | BoardError::Persistence(_) | BoardError::Io(_)) => {
                "storage"
            }
            Some(BoardError::Serialization(_)) => "corrupt-data",
            Some(BoardError::Notification(_) | BoardError::Internal(_)) => "internal",
            // Handler-side argument checks bail with plain messages.
            None => "usage",
        };
        Self {
            kind,
            message: format!("{:#}", err),
        }
    }

    fn usage(message: &str) -> Self {
        Self {
            kind: "usage",
            message: message.to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct ListResponse<T: Serialize> {
    pub items: Vec<T>,
    pub count: usize,
}

pub fn output_success<T: Serialize>(data: T) {
    let envelope = Envelope {
        success: true,
        api_version: env!("CARGO_PKG_VERSION"),
        data: Some(data),
        error: None,
    };
    match serde_json::to_string(&envelope) {
        Ok(json) => println!("{}", json),
        Err(e) => output_usage_error(&format!("Failed to encode output: {}", e)),
    }
}

pub fn output_list<T: Serialize>(items: Vec<T>) {
    let count = items.len();
    output_success(ListResponse { items, count });
}

pub fn output_error(err: &anyhow::Error) -> ! {
    fail(ErrorBody::from_error(err))
}

pub fn output_usage_error(message: &str) -> ! {
    fail(ErrorBody::usage(message))
}

/// Prints the failure envelope to stderr and exits with status 1.
fn fail(body: ErrorBody) -> ! {
    let envelope: Envelope<()> = Envelope {
        success: false,
        api_version: env!("CARGO_PKG_VERSION"),
        data: None,
        error: Some(body),
    };
    match serde_json::to_string(&envelope) {
        Ok(json) => eprintln!("{}", json),
        Err(_) => eprintln!("command failed"),
    }
    std::process::exit(1);
}
