use serde_json::Value;
use xcdiag_model::CrashSummary;

/// Project an already-decoded crash-report document into a [`CrashSummary`].
///
/// Pure optional-field projection: every top-level key may be absent, and
/// scalar fields tolerate both string and numeric JSON values (reports encode
/// indicators and signals either way).
#[must_use]
pub fn parse_crash_report(document: &Value) -> CrashSummary {
    let exception = document.get("exception");
    let termination = document.get("termination");

    CrashSummary {
        process_name: string_at(document.get("procName")),
        bundle_id: string_at(
            document
                .get("bundleInfo")
                .and_then(|info| info.get("CFBundleIdentifier")),
        ),
        exception_type: string_at(exception.and_then(|e| e.get("type"))),
        signal: string_at(exception.and_then(|e| e.get("signal"))),
        termination_namespace: string_at(termination.and_then(|t| t.get("namespace"))),
        termination_indicator: string_at(termination.and_then(|t| t.get("indicator"))),
        termination_reasons: strings_at(termination.and_then(|t| t.get("reasons"))),
        termination_details: strings_at(termination.and_then(|t| t.get("details"))),
        is_fatal_dyld_error: is_truthy(document.get("fatalDyldError")),
    }
}

fn string_at(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn strings_at(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| string_at(Some(item)))
                .collect()
        })
        .unwrap_or_default()
}

/// `true` boolean or non-zero number; strings and objects are not truthy.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => false,
    }
}
