use anyhow::{bail, Context as AnyhowContext, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use xcdiag_analyze::{finalize_build_run, finalize_test_run, TestRunContext};
use xcdiag_bundle::{list_test_attachments, read_result_bundle, SystemRunner};
use xcdiag_crash::{find_recent_reports, parse_crash_report, transcript_indicates_crash};
use xcdiag_extract::extract_build_results;
use xcdiag_model::{format_build_report, format_test_report, BuildResult};
use xcdiag_preview::extract_marked_blocks;

#[derive(Parser)]
#[command(name = "xcdiag")]
#[command(about = "Build/test diagnostics for Xcode tooling", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a saved build log and print the build report
    BuildLog {
        /// Log file captured from the build invocation
        file: PathBuf,

        /// File holding the invocation's captured stderr
        #[arg(long)]
        stderr: Option<PathBuf>,
    },

    /// Parse a saved test log and print the test report
    TestLog {
        /// Log file captured from the test invocation
        file: PathBuf,

        /// Explicit test selectors the run was restricted to
        #[arg(long = "only-testing")]
        only_testing: Vec<String>,

        /// Project root directory, for scheme suggestion
        #[arg(long, default_value = ".")]
        project_root: PathBuf,

        /// Project bundle path (…/App.xcodeproj); defaults to the root
        #[arg(long)]
        project_path: Option<PathBuf>,

        /// File holding the invocation's captured stderr
        #[arg(long)]
        stderr: Option<PathBuf>,
    },

    /// Introspect a result bundle and print its report
    Bundle {
        /// Path to the .xcresult bundle
        path: PathBuf,
    },

    /// Export and list the test attachments of a result bundle
    Attachments {
        /// Path to the .xcresult bundle
        path: PathBuf,

        /// Directory to export attachments into
        #[arg(long)]
        output: PathBuf,
    },

    /// Summarize a crash report JSON file
    Crash {
        /// Path to the decoded crash report (.ips JSON body)
        file: PathBuf,
    },

    /// Search the diagnostic-reports directories for recent crash reports
    CrashSearch {
        /// Process-name substring to match
        hint: String,

        /// Recency window in minutes
        #[arg(long, default_value_t = 60)]
        minutes: u64,
    },

    /// Classify a debugger console transcript as crash/no-crash
    Debugger {
        /// Transcript file
        file: PathBuf,
    },

    /// List preview blocks declared in a source file
    Previews {
        /// Source file to scan
        file: PathBuf,

        /// Marker token introducing a block
        #[arg(long, default_value = "#Preview")]
        marker: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::BuildLog { file, stderr } => {
            let output = read_input(&file)?;
            let stderr = read_optional(stderr.as_deref())?;
            let result = extract_build_results(&output);
            let report = finalize_build_run(&result, &stderr)?;
            println!("{report}");
        }
        Commands::TestLog {
            file,
            only_testing,
            project_root,
            project_path,
            stderr,
        } => {
            let output = read_input(&file)?;
            let stderr = read_optional(stderr.as_deref())?;
            let result = extract_build_results(&output);
            log::debug!(
                "extracted {} failed tests, {} errors from {}",
                result.summary.failed_test_count,
                result.summary.error_count,
                file.display()
            );
            let context = TestRunContext {
                only_testing,
                project_path: project_path.unwrap_or_else(|| project_root.clone()),
                project_root,
            };
            let report = finalize_test_run(&result, &stderr, &context)?;
            println!("{report}");
        }
        Commands::Bundle { path } => {
            let Some(result) = read_result_bundle(&path, &SystemRunner) else {
                bail!("could not introspect result bundle at {}", path.display());
            };
            println!("{}", render_bundle_report(&result));
        }
        Commands::Attachments { path, output } => {
            let attachments = list_test_attachments(&path, &output, &SystemRunner);
            if attachments.is_empty() {
                println!("No attachments");
            }
            for attachment in attachments {
                let marker = if attachment.is_associated_with_failure {
                    " [failure]"
                } else {
                    ""
                };
                let owner = attachment.test_identifier.as_deref().unwrap_or("-");
                println!(
                    "{}{marker}  {} ({owner})",
                    attachment.exported_file_name, attachment.display_name
                );
            }
        }
        Commands::Crash { file } => {
            let raw = read_input(&file)?;
            let document = serde_json::from_str(&raw)
                .with_context(|| format!("undecodable crash report {}", file.display()))?;
            let summary = parse_crash_report(&document);
            let formatted = summary.formatted();
            if formatted.is_empty() {
                println!("No crash details recognized");
            } else {
                println!("{formatted}");
            }
        }
        Commands::CrashSearch { hint, minutes } => {
            let entries = find_recent_reports(&hint, minutes);
            if entries.is_empty() {
                println!("No crash reports matching '{hint}' in the last {minutes} minutes");
            }
            for entry in entries {
                println!("{}", entry.path.display());
            }
        }
        Commands::Debugger { file } => {
            let transcript = read_input(&file)?;
            if transcript_indicates_crash(&transcript) {
                println!("crash detected");
            } else {
                println!("no crash detected");
            }
        }
        Commands::Previews { file, marker } => {
            let source = read_input(&file)?;
            let blocks = extract_marked_blocks(&source, &marker);
            if blocks.is_empty() {
                println!("No preview blocks");
            }
            for (index, block) in blocks.iter().enumerate() {
                let name = block.name.as_deref().unwrap_or("(unnamed)");
                println!("#{} {name}", index + 1);
                println!("{}", block.body);
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let env = env_logger::Env::default().default_filter_or(level);
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .init();
}

fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("unreadable input {}", path.display()))
}

fn read_optional(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => read_input(path),
        None => Ok(String::new()),
    }
}

/// A bundle may describe a build or a test run; pick the renderer by what the
/// result actually carries.
fn render_bundle_report(result: &BuildResult) -> String {
    let looks_like_test_run = result.summary.passed_test_count.is_some()
        || !result.failed_tests.is_empty()
        || result.coverage.is_some();
    if looks_like_test_run {
        format_test_report(result)
    } else {
        format_build_report(result)
    }
}
