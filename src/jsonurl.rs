//! Fetch a JSON document and walk a chain of keys into it.

use reqwest::blocking::Client;
use serde_json::Value;
use tracing::debug;

use crate::cli::JsonUrlCli;
use crate::error::JsonUrlError;

/// Issues a single GET and decodes the body as JSON.
pub fn fetch(client: &Client, url: &str) -> Result<Value, JsonUrlError> {
    debug!(url, "fetching document");
    let fetch_err = |source: reqwest::Error| JsonUrlError::Fetch {
        url: url.to_string(),
        source,
    };
    let body = client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.text())
        .map_err(fetch_err)?;

    serde_json::from_str(&body).map_err(|source| JsonUrlError::Parse {
        url: url.to_string(),
        source,
    })
}

/// Looks `key` up in `value`. Only objects hold keys.
pub fn lookup<'a>(value: &'a Value, key: &str) -> Result<&'a Value, JsonUrlError> {
    match value {
        Value::Object(map) => map
            .get(key)
            .ok_or_else(|| JsonUrlError::KeyNotFound(key.to_string())),
        other => {
            debug!(key, kind = kind_of(other), "cannot index into non-object");
            Err(JsonUrlError::NotAnObject {
                key: key.to_string(),
                kind: kind_of(other),
            })
        }
    }
}

/// Applies `keys` in order, stopping at the first one that is missing.
pub fn extract<'a, S: AsRef<str>>(
    document: &'a Value,
    keys: &[S],
) -> Result<&'a Value, JsonUrlError> {
    keys.iter()
        .try_fold(document, |current, key| lookup(current, key.as_ref()))
}

/// Strings print as raw text, everything else as compact JSON.
pub fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Runs the whole fetch-and-extract flow, returning the text to print.
pub fn run(cli: &JsonUrlCli, program: &str) -> Result<String, JsonUrlError> {
    let url = cli.url().ok_or_else(|| JsonUrlError::Usage {
        program: program.to_string(),
    })?;

    let client = Client::new();
    let document = fetch(&client, url)?;
    let value = extract(&document, cli.keys())?;
    Ok(render(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn follows_keys_in_order() {
        let doc = json!({"a": {"b": 42}});
        assert_eq!(extract(&doc, &["a", "b"]).unwrap(), &json!(42));
    }

    #[test]
    fn zero_keys_returns_whole_document() {
        let doc = json!({"a": [1, 2, {"c": null}]});
        let keys: [&str; 0] = [];
        assert_eq!(extract(&doc, &keys).unwrap(), &doc);
    }

    #[test]
    fn reports_first_missing_key() {
        let doc = json!({"a": {"b": 42}});
        let err = extract(&doc, &["a", "c", "d"]).unwrap_err();
        assert!(matches!(&err, JsonUrlError::KeyNotFound(key) if key == "c"));
        assert_eq!(err.to_string(), "'c' was not found");
    }

    #[test]
    fn non_object_has_no_keys() {
        let doc = json!({"a": [1, 2, 3]});
        let err = extract(&doc, &["a", "0", "x"]).unwrap_err();
        assert!(matches!(&err, JsonUrlError::NotAnObject { key, .. } if key == "0"));
        assert_eq!(err.to_string(), "'0' was not found (value is an array)");

        let err = lookup(&json!("text"), "len").unwrap_err();
        assert_eq!(err.to_string(), "'len' was not found (value is a string)");

        let err = lookup(&json!(null), "k").unwrap_err();
        assert_eq!(err.to_string(), "'k' was not found (value is null)");
    }

    #[test]
    fn render_strings_raw_and_others_as_json() {
        assert_eq!(render(&json!("héllo")), "héllo");
        assert_eq!(render(&json!(42)), "42");
        assert_eq!(render(&json!(null)), "null");
        assert_eq!(render(&json!({"k": [true]})), r#"{"k":[true]}"#);
    }

    #[test]
    fn fetch_parses_served_document() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/state.json");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"flags": {"port": "5050"}}"#);
        });

        let doc = fetch(&Client::new(), &server.url("/state.json")).unwrap();
        mock.assert();
        assert_eq!(render(extract(&doc, &["flags", "port"]).unwrap()), "5050");
    }

    #[test]
    fn fetch_rejects_malformed_json() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/broken");
            then.status(200).body("{not json");
        });

        let err = fetch(&Client::new(), &server.url("/broken")).unwrap_err();
        assert!(matches!(err, JsonUrlError::Parse { .. }));
    }

    #[test]
    fn fetch_treats_error_status_as_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404);
        });

        let err = fetch(&Client::new(), &server.url("/missing")).unwrap_err();
        assert!(matches!(err, JsonUrlError::Fetch { .. }));
    }

    #[test]
    fn run_without_url_is_usage_error() {
        let cli = JsonUrlCli {
            verbose: false,
            args: vec![],
        };
        let err = run(&cli, "jsonurl").unwrap_err();
        assert_eq!(err.to_string(), "USAGE: jsonurl URL [KEY...]");
    }
}
