//! JSON formatter.

use anyhow::{Context, Result};
use serde::Serialize;

pub struct JsonFormatter;

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Error serializing results")
}
