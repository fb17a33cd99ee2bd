// ABOUTME: Best-effort recovery of a JSON object from raw LLM text output
// ABOUTME: Strips fences and comments, slices the object, balances brackets, then parses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ZindeAI

//! # Text-to-JSON Recovery
//!
//! Model output that should be JSON frequently arrives wrapped in markdown
//! fences, annotated with comments, or truncated mid-structure. This module
//! is one pure function that repairs what it can and fails deterministically
//! on what it cannot - it never panics and never returns partially-consumed
//! state.
//!
//! Recovery has no correctness guarantee: a truncated document that parses
//! after bracket balancing may be semantically incomplete. Semantic checks
//! live in [`super::validation`].

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::{AppError, ErrorCode};

/// Extract a JSON object from raw model text
///
/// Pipeline: strip markdown fences, strip `//` and `/* */` comments outside
/// string literals, slice from the first `{` to the last `}`, parse, and if
/// that fails close any open string and append the missing bracket closers
/// before one final attempt.
///
/// # Errors
///
/// Returns `EXTERNAL_SERVICE_ERROR` when no object can be recovered.
pub fn extract_json(raw: &str) -> Result<Value, AppError> {
    let without_fences = strip_fences(raw);
    let without_comments = strip_comments(&without_fences);
    let sliced = slice_object(&without_comments)?;

    if let Ok(value) = serde_json::from_str::<Value>(sliced) {
        return Ok(value);
    }

    let balanced = balance_brackets(sliced);
    serde_json::from_str::<Value>(&balanced).map_err(|e| {
        AppError::new(
            ErrorCode::ExternalServiceError,
            format!("Model output is not recoverable JSON: {e}"),
        )
        .with_details(serde_json::json!({
            "preview": sliced.chars().take(120).collect::<String>()
        }))
    })
}

/// Decode a recovered JSON value into a typed plan
///
/// # Errors
///
/// Returns `EXTERNAL_SERVICE_ERROR` naming the decode failure; the model
/// produced a structure the client contract does not accept.
pub fn decode_plan<T: DeserializeOwned>(value: Value) -> Result<T, AppError> {
    serde_json::from_value(value).map_err(|e| {
        AppError::new(
            ErrorCode::ExternalServiceError,
            format!("Model output does not match the plan schema: {e}"),
        )
    })
}

/// Remove markdown code-fence markers (```json ... ```)
fn strip_fences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find("```") {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + 3..];
        // Swallow the language tag on opening fences
        if let Some(tag) = rest.get(..4) {
            if tag.eq_ignore_ascii_case("json") {
                rest = &rest[4..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Remove `//` line comments and `/* */` block comments outside strings
fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
        } else if c == '"' {
            in_string = true;
            out.push(c);
        } else if c == '/' && chars.peek() == Some(&'/') {
            chars.next();
            for skipped in chars.by_ref() {
                if skipped == '\n' {
                    out.push('\n');
                    break;
                }
            }
        } else if c == '/' && chars.peek() == Some(&'*') {
            chars.next();
            let mut prev = ' ';
            for skipped in chars.by_ref() {
                if prev == '*' && skipped == '/' {
                    break;
                }
                prev = skipped;
            }
        } else {
            out.push(c);
        }
    }

    out
}

/// Slice from the first `{` to the last `}` (or the end, when truncated)
fn slice_object(text: &str) -> Result<&str, AppError> {
    let start = text.find('{').ok_or_else(|| {
        AppError::new(
            ErrorCode::ExternalServiceError,
            "Model output contains no JSON object",
        )
    })?;

    match text.rfind('}') {
        Some(end) if end > start => Ok(&text[start..=end]),
        // Truncated output: keep everything after the opening brace and let
        // bracket balancing close it.
        _ => Ok(&text[start..]),
    }
}

/// Append closers for unbalanced `{`/`[` (and an unterminated string)
fn balance_brackets(text: &str) -> String {
    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_string {
            match c {
                '\\' => {
                    chars.next();
                }
                '"' => in_string = false,
                _ => {}
            }
        } else {
            match c {
                '"' => in_string = true,
                '{' => stack.push('}'),
                '[' => stack.push(']'),
                '}' | ']' => {
                    if stack.last() == Some(&c) {
                        stack.pop();
                    }
                }
                _ => {}
            }
        }
    }

    let mut out = text.to_owned();
    if in_string {
        out.push('"');
    }
    // A truncation right after a comma would make the closers invalid
    let trimmed_len = out.trim_end().trim_end_matches(',').len();
    out.truncate(trimmed_len);
    while let Some(closer) = stack.pop() {
        out.push(closer);
    }
    out
}
