//! Request and response envelopes for the HTTP surface.

use serde::Serialize;
use serde_json::Value;
use service_core::error::AppError;

pub const MISSING_INPUT_MESSAGE: &str = "❌ Se requiere texto de entrada";
pub const INVALID_INPUT_TYPE_MESSAGE: &str = "❌ El texto de entrada debe ser una cadena";

/// Body of `POST /generate-phrases`.
///
/// `userInput` is kept as a raw JSON value so that every falsy shape
/// (missing, `null`, `""`, `false`, `0`) maps to the same rejection.
#[derive(Debug, Default)]
pub struct GenerateRequest {
    pub user_input: Option<Value>,
}

impl GenerateRequest {
    /// Pick `userInput` out of a decoded body. Only a JSON object carries
    /// fields; arrays and scalars yield no input at all.
    pub fn from_body(body: Value) -> Self {
        match body {
            Value::Object(mut fields) => Self {
                user_input: fields.remove("userInput"),
            },
            _ => Self::default(),
        }
    }

    /// Extract the text to forward, rejecting falsy and non-string input.
    pub fn into_user_input(self) -> Result<String, AppError> {
        match self.user_input {
            None | Some(Value::Null) | Some(Value::Bool(false)) => Err(missing_input()),
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Err(missing_input()),
            Some(Value::String(text)) if text.is_empty() => Err(missing_input()),
            Some(Value::String(text)) => Ok(text),
            Some(_) => Err(AppError::BadRequest(anyhow::anyhow!(
                INVALID_INPUT_TYPE_MESSAGE
            ))),
        }
    }
}

fn missing_input() -> AppError {
    AppError::BadRequest(anyhow::anyhow!(MISSING_INPUT_MESSAGE))
}

/// Successful generation: the provider's content, untouched.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub result: Value,
}
