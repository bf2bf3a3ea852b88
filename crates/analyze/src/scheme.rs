use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// `TestAction/Testables` section of a scheme definition file.
static TESTABLES_SECTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<Testables>(.*?)</Testables>").expect("testables regex"));

/// `BlueprintName` attribute of a `BuildableReference`.
static BLUEPRINT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"BlueprintName\s*=\s*"([^"]+)""#).expect("blueprint regex"));

/// Find the schemes whose test action declares the given target.
///
/// Only the first `/` segment of the identifier is the target name
/// (`Target/Case/test` selects target `Target`). Scheme files are re-read on
/// every call — schemes change between invocations and staleness would be
/// worse than the scan. Returns scheme names sorted alphabetically; zero
/// matches is an empty vector.
#[must_use]
pub fn schemes_declaring_target(
    project_root: &Path,
    project_path: &Path,
    identifier: &str,
) -> Vec<String> {
    let target = identifier.split('/').next().unwrap_or(identifier);
    if target.is_empty() {
        return Vec::new();
    }

    let mut scheme_files = discover_scheme_files(project_path);
    if scheme_files.is_empty() {
        scheme_files = discover_scheme_files(project_root);
    }

    let mut matches: Vec<String> = Vec::new();
    for path in scheme_files {
        let Ok(contents) = fs::read_to_string(&path) else {
            log::debug!("unreadable scheme file {}", path.display());
            continue;
        };
        if !declared_test_targets(&contents).iter().any(|t| t == target) {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        if !matches.iter().any(|existing| existing == name) {
            matches.push(name.to_string());
        }
    }

    matches.sort();
    matches
}

/// The sentence appended to a raised error when alternative schemes exist.
///
/// `None` for zero matches; otherwise the candidates are quoted and
/// comma-joined under the fixed introductory phrase.
#[must_use]
pub fn suggestion_clause(target: &str, schemes: &[String]) -> Option<String> {
    if schemes.is_empty() {
        return None;
    }
    let quoted: Vec<String> = schemes.iter().map(|name| format!("'{name}'")).collect();
    Some(format!(
        "Did you mean a different scheme? Target '{}' is declared by scheme(s): {}.",
        target,
        quoted.join(", ")
    ))
}

fn discover_scheme_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("xcscheme"))
        })
        .collect();
    files.sort();
    files
}

fn declared_test_targets(scheme_xml: &str) -> Vec<String> {
    let mut targets = Vec::new();
    for section in TESTABLES_SECTION.captures_iter(scheme_xml) {
        for blueprint in BLUEPRINT_NAME.captures_iter(&section[1]) {
            targets.push(blueprint[1].to_string());
        }
    }
    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn scheme_xml(blueprint: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<Scheme LastUpgradeVersion="1500" version="1.7">
   <TestAction buildConfiguration="Debug">
      <Testables>
         <TestableReference skipped="NO">
            <BuildableReference
               BuildableIdentifier="primary"
               BlueprintIdentifier="0123ABCD"
               BuildableName="{blueprint}.xctest"
               BlueprintName="{blueprint}"
               ReferencedContainer="container:App.xcodeproj">
            </BuildableReference>
         </TestableReference>
      </Testables>
   </TestAction>
</Scheme>
"#
        )
    }

    fn write_scheme(dir: &Path, scheme_name: &str, blueprint: &str) {
        let schemes_dir = dir.join("xcshareddata").join("xcschemes");
        fs::create_dir_all(&schemes_dir).expect("create scheme dir");
        fs::write(
            schemes_dir.join(format!("{scheme_name}.xcscheme")),
            scheme_xml(blueprint),
        )
        .expect("write scheme");
    }

    #[test]
    fn matching_scheme_found_by_target_name() {
        let temp = tempdir().expect("tempdir");
        let project = temp.path().join("App.xcodeproj");
        write_scheme(&project, "TestApp", "Wrong");

        let schemes = schemes_declaring_target(temp.path(), &project, "Wrong");
        assert_eq!(schemes, vec!["TestApp".to_string()]);
    }

    #[test]
    fn slash_qualified_identifier_uses_first_segment() {
        let temp = tempdir().expect("tempdir");
        let project = temp.path().join("App.xcodeproj");
        write_scheme(&project, "TestApp", "UnitTests");

        let schemes = schemes_declaring_target(temp.path(), &project, "UnitTests/LoginCase/test");
        assert_eq!(schemes, vec!["UnitTests".to_string()]);
    }

    #[test]
    fn no_declaration_means_no_matches() {
        let temp = tempdir().expect("tempdir");
        let project = temp.path().join("App.xcodeproj");
        write_scheme(&project, "TestApp", "Other");

        assert!(schemes_declaring_target(temp.path(), &project, "Missing").is_empty());
    }

    #[test]
    fn falls_back_to_project_root() {
        let temp = tempdir().expect("tempdir");
        let project = temp.path().join("App.xcodeproj");
        // schemes live outside the project path (workspace-style layout)
        write_scheme(temp.path(), "RootScheme", "Suite");

        let schemes = schemes_declaring_target(temp.path(), &project, "Suite");
        assert_eq!(schemes, vec!["RootScheme".to_string()]);
    }

    #[test]
    fn matches_sorted_by_scheme_name() {
        let temp = tempdir().expect("tempdir");
        let project = temp.path().join("App.xcodeproj");
        write_scheme(&project, "Zeta", "Suite");
        let other_dir = project.join("xcuserdata").join("dev.xcuserdatad");
        fs::create_dir_all(other_dir.join("xcschemes")).expect("create user dir");
        fs::write(
            other_dir.join("xcschemes").join("Alpha.xcscheme"),
            scheme_xml("Suite"),
        )
        .expect("write scheme");

        let schemes = schemes_declaring_target(temp.path(), &project, "Suite");
        assert_eq!(schemes, vec!["Alpha".to_string(), "Zeta".to_string()]);
    }

    #[test]
    fn suggestion_clause_formats_candidates() {
        assert_eq!(suggestion_clause("Wrong", &[]), None);
        let clause = suggestion_clause(
            "Wrong",
            &["TestApp".to_string(), "TestAppCI".to_string()],
        )
        .expect("clause");
        assert!(clause.starts_with("Did you mean a different scheme?"));
        assert!(clause.contains("'TestApp', 'TestAppCI'"));
    }

    #[test]
    fn blueprint_outside_testables_is_ignored() {
        let xml = r#"
<Scheme>
   <BuildAction>
      <BuildableReference BlueprintName="App"/>
   </BuildAction>
   <TestAction>
      <Testables>
      </Testables>
   </TestAction>
</Scheme>
"#;
        assert!(declared_test_targets(xml).is_empty());
    }
}
