/// Core error type for bootstrap and adapter plumbing.
///
/// Adapter crates map their transport errors into this type. Evaluation and
/// fetch failures have their own enums below because they are always turned
/// into a user-facing reply instead of bubbling up.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure of the arithmetic evaluator.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("invalid character {0:?}")]
    InvalidCharacter(char),

    #[error("not an arithmetic expression")]
    NotAnExpression,

    #[error("division by zero")]
    DivisionByZero,

    #[error("malformed expression")]
    MalformedExpression,
}

impl EvalError {
    pub fn user_message(&self) -> String {
        match self {
            EvalError::InvalidCharacter(c) => format!(
                "❌ Unsupported character <code>{}</code>.\nOnly digits, <code>+ - * / ( ) .</code> and spaces are allowed.",
                crate::formatting::escape_html(&c.to_string())
            ),
            EvalError::NotAnExpression => {
                "🤔 Not a recognized expression.\nTry something like <code>2+2*3</code>.".to_string()
            }
            EvalError::DivisionByZero => "❌ Division by zero is not allowed.".to_string(),
            EvalError::MalformedExpression => {
                "❌ Could not parse the expression. Check brackets and operators.".to_string()
            }
        }
    }
}

/// Failure of the quote fetch pipeline.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("all rate sources exhausted")]
    AllSourcesExhausted,

    #[error("source timed out: {0}")]
    Timeout(String),
}

impl FetchError {
    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::SourceUnavailable(_) => {
                "❌ The data provider is unavailable right now. Try again in a minute."
            }
            FetchError::AllSourcesExhausted => {
                "❌ No exchange-rate provider answered. Try again in a minute."
            }
            FetchError::Timeout(_) => {
                "⌛ The data provider took too long to answer. Try again in a minute."
            }
        }
    }
}
