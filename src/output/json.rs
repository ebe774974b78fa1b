//! JSON output formatting

use serde_json::json;

use crate::collection::Primitive;
use crate::engine::executor::{ExecutionResult, ResultData};
use crate::error::Result;

/// Turns an exported tree into text
pub trait Encoder {
    fn encode(&self, tree: &Primitive) -> Result<String>;
}

/// Options for [`JsonEncoder`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonOptions {
    pub pretty: bool,
}

impl JsonOptions {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

/// serde_json backed encoder. Sequences become arrays and mappings become
/// objects with their key order kept.
#[derive(Debug, Clone, Default)]
pub struct JsonEncoder {
    options: JsonOptions,
}

impl JsonEncoder {
    pub fn new(options: JsonOptions) -> Self {
        Self { options }
    }
}

impl Encoder for JsonEncoder {
    fn encode(&self, tree: &Primitive) -> Result<String> {
        let text = if self.options.pretty {
            serde_json::to_string_pretty(tree)?
        } else {
            serde_json::to_string(tree)?
        };
        Ok(text)
    }
}

pub fn format_json(result: &ExecutionResult, options: JsonOptions) -> Result<String> {
    match &result.data {
        ResultData::Value(value) => JsonEncoder::new(options).encode(&Primitive::from(value)),
        ResultData::Explanation(lines) => {
            let data = json!({ "explanation": lines });
            Ok(if options.pretty {
                serde_json::to_string_pretty(&data)?
            } else {
                data.to_string()
            })
        }
    }
}
