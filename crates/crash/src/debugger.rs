use once_cell::sync::Lazy;
use regex::Regex;

/// Signals whose stop reason indicates the debuggee crashed.
const CRASH_SIGNALS: &[&str] = &[
    "SIGABRT", "SIGSEGV", "SIGBUS", "SIGILL", "SIGFPE", "SIGSYS", "SIGKILL",
];

/// Mach exceptions whose stop reason indicates a crash.
const CRASH_EXCEPTIONS: &[&str] = &["EXC_CRASH", "EXC_BAD_ACCESS", "EXC_BAD_INSTRUCTION"];

static STOP_REASON_SIGNAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"stop reason = signal (?P<sig>SIG[A-Z0-9]+)").expect("signal regex")
});

static STOP_REASON_EXCEPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"stop reason = (?P<exc>EXC_[A-Z_]+)").expect("exception regex")
});

static PROCESS_EXIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[Pp]rocess \d+ exited with status = (?P<status>-?\d+)").expect("exit regex")
});

/// Does a debugger console transcript indicate the debuggee crashed?
///
/// Pure substring/pattern test over the whole transcript. Breakpoint stops,
/// module-load/resume/attach chatter, and empty input classify as no-crash.
#[must_use]
pub fn transcript_indicates_crash(transcript: &str) -> bool {
    if transcript.is_empty() {
        return false;
    }

    for caps in STOP_REASON_SIGNAL.captures_iter(transcript) {
        if CRASH_SIGNALS.contains(&&caps["sig"]) {
            return true;
        }
    }

    for caps in STOP_REASON_EXCEPTION.captures_iter(transcript) {
        if CRASH_EXCEPTIONS.contains(&&caps["exc"]) {
            return true;
        }
    }

    for caps in PROCESS_EXIT.captures_iter(transcript) {
        if &caps["status"] != "0" {
            return true;
        }
    }

    false
}
