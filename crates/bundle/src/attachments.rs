use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::runner::CommandRunner;
use crate::xcresult::{elements, f64_value, field, string_value};
use xcdiag_model::TestAttachment;

/// Export and list the attachments recorded in a result bundle's test run.
///
/// Drives the introspection tool's attachment export into `export_dir`, then
/// projects the manifest it writes there. Any failure along the way — tool
/// missing, export failing, manifest unreadable or unparseable — yields the
/// empty vector.
#[must_use]
pub fn list_test_attachments(
    bundle: &Path,
    export_dir: &Path,
    runner: &dyn CommandRunner,
) -> Vec<TestAttachment> {
    let bundle_arg = bundle.to_string_lossy();
    let export_arg = export_dir.to_string_lossy();

    match runner.run(
        "xcrun",
        &[
            "xcresulttool",
            "export",
            "attachments",
            "--path",
            &bundle_arg,
            "--output-path",
            &export_arg,
        ],
    ) {
        Ok(output) if output.status_ok => {}
        Ok(output) => {
            log::warn!(
                "attachment export exited non-zero for {}: {}",
                bundle.display(),
                output.stderr.trim()
            );
            return Vec::new();
        }
        Err(err) => {
            log::warn!("attachment export failed to launch: {err}");
            return Vec::new();
        }
    }

    let manifest_path = export_dir.join("manifest.json");
    let raw = match fs::read_to_string(&manifest_path) {
        Ok(raw) => raw,
        Err(err) => {
            log::warn!("unreadable manifest {}: {err}", manifest_path.display());
            return Vec::new();
        }
    };
    let manifest: Value = match serde_json::from_str(&raw) {
        Ok(manifest) => manifest,
        Err(err) => {
            log::warn!("undecodable manifest {}: {err}", manifest_path.display());
            return Vec::new();
        }
    };

    attachments_from_manifest(&manifest)
}

fn attachments_from_manifest(manifest: &Value) -> Vec<TestAttachment> {
    let mut attachments = Vec::new();

    for entry in elements(Some(manifest)) {
        let test_identifier = field(entry, "testIdentifier").and_then(string_value);
        for attachment in elements(field(entry, "attachments")) {
            let Some(exported_file_name) =
                field(attachment, "exportedFileName").and_then(string_value)
            else {
                continue;
            };
            let display_name = field(attachment, "suggestedHumanReadableName")
                .and_then(string_value)
                .unwrap_or_else(|| exported_file_name.clone());
            let is_associated_with_failure = field(attachment, "isAssociatedWithFailure")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            let timestamp = field(attachment, "timestamp").and_then(f64_value);

            attachments.push(TestAttachment {
                test_identifier: test_identifier.clone(),
                exported_file_name,
                display_name,
                is_associated_with_failure,
                timestamp,
            });
        }
    }

    attachments
}
