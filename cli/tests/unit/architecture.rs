//! Structural tests for architectural boundary enforcement.
//!
//! These tests scan source files to verify that the layer boundaries hold:
//! domain is pure, services speak only to ports, infra never prints.

use std::path::Path;

/// Collect all `.rs` files under a directory recursively.
fn collect_rs_files(dir: &Path) -> Vec<std::path::PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// Read a file and strip comment lines to avoid false positives.
fn read_non_comment_lines(path: &Path) -> Vec<String> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    content
        .lines()
        .filter(|l| {
            let trimmed = l.trim();
            !trimmed.starts_with("//") && !trimmed.starts_with("/*") && !trimmed.starts_with('*')
        })
        .map(String::from)
        .collect()
}

/// Track brace depth and return whether a line is inside a `#[cfg(test)]` block.
struct CfgTestTracker {
    in_test_block: bool,
    brace_depth: i32,
    test_block_start_depth: i32,
}

impl CfgTestTracker {
    fn new() -> Self {
        Self {
            in_test_block: false,
            brace_depth: 0,
            test_block_start_depth: 0,
        }
    }

    /// Process a line and return `true` if it's inside a `#[cfg(test)]` block.
    fn process_line(&mut self, line: &str) -> bool {
        let trimmed = line.trim();
        if trimmed.contains("#[cfg(test)]") {
            self.in_test_block = true;
            self.test_block_start_depth = self.brace_depth;
        }
        for ch in line.chars() {
            match ch {
                '{' => self.brace_depth += 1,
                '}' => {
                    self.brace_depth -= 1;
                    if self.in_test_block && self.brace_depth <= self.test_block_start_depth {
                        self.in_test_block = false;
                    }
                }
                _ => {}
            }
        }
        self.in_test_block
    }
}

fn rel(file: &Path) -> String {
    file.strip_prefix(env!("CARGO_MANIFEST_DIR"))
        .unwrap_or(file)
        .display()
        .to_string()
}

fn src_dir(parts: &[&str]) -> std::path::PathBuf {
    parts
        .iter()
        .fold(Path::new(env!("CARGO_MANIFEST_DIR")).join("src"), |p, part| p.join(part))
}

/// Every non-comment line in `dir` containing one of `needles`.
fn find_forbidden(dir: &Path, needles: &[&str]) -> Vec<String> {
    let mut violations = Vec::new();
    for file in collect_rs_files(dir) {
        let rel = rel(&file);
        for (i, line) in read_non_comment_lines(&file).iter().enumerate() {
            for needle in needles {
                if line.contains(needle) {
                    violations.push(format!("{rel}:{}: `{needle}`: {line}", i + 1));
                }
            }
        }
    }
    violations
}

// ── Renderer owns output-mode branching ───────────────────────────────────────

#[test]
fn no_inline_json_branching_in_commands() {
    let mut violations: Vec<String> = Vec::new();

    for file in collect_rs_files(&src_dir(&["commands"])) {
        let rel = rel(&file);
        for (i, line) in read_non_comment_lines(&file).iter().enumerate() {
            let lineno = i + 1;
            if line.contains("json: bool") {
                violations.push(format!("{rel}:{lineno}: found `json: bool` parameter: {line}"));
            }
            let trimmed = line.trim();
            if trimmed.starts_with("if json") || trimmed.starts_with("if !json") {
                violations.push(format!("{rel}:{lineno}: found inline JSON branch: {line}"));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "Found inline JSON branching in commands/: use app.renderer() instead:\n{}",
        violations.join("\n")
    );
}

// ── Layer boundaries ──────────────────────────────────────────────────────────

#[test]
fn domain_is_pure() {
    let violations = find_forbidden(
        &src_dir(&["domain"]),
        &[
            "crate::infra",
            "crate::application",
            "crate::commands",
            "crate::output",
            "tokio",
            "std::fs",
            "reqwest",
        ],
    );
    assert!(
        violations.is_empty(),
        "domain/ must not perform I/O or import outer layers:\n{}",
        violations.join("\n")
    );
}

#[test]
fn application_does_not_import_outer_layers() {
    let violations = find_forbidden(
        &src_dir(&["application"]),
        &["crate::infra", "crate::commands", "crate::output", "reqwest", "std::fs"],
    );
    assert!(
        violations.is_empty(),
        "application/ must only use domain and ports:\n{}",
        violations.join("\n")
    );
}

#[test]
fn infra_has_no_imports_from_commands_or_output() {
    let violations = find_forbidden(&src_dir(&["infra"]), &["crate::commands", "crate::output"]);
    assert!(
        violations.is_empty(),
        "infra/ must not import from commands/ or output/:\n{}",
        violations.join("\n")
    );
}

#[test]
fn only_infra_talks_http() {
    let mut violations = Vec::new();
    for dir in ["domain", "application", "commands", "output"] {
        violations.extend(find_forbidden(&src_dir(&[dir]), &["reqwest::"]));
    }
    assert!(
        violations.is_empty(),
        "HTTP calls belong in infra/linode.rs:\n{}",
        violations.join("\n")
    );
}

// ── Trait bounds over concrete types ──────────────────────────────────────────

#[test]
fn no_concrete_adapters_in_service_signatures() {
    let concrete_types = ["LinodeClient", "JsonRegistryStore", "TerminalReporter", "TerminalConfirmer"];
    let mut violations: Vec<String> = Vec::new();

    for file in collect_rs_files(&src_dir(&["application", "services"])) {
        let rel = rel(&file);
        for (i, line) in read_non_comment_lines(&file).iter().enumerate() {
            for concrete in &concrete_types {
                if line.contains(concrete) {
                    violations.push(format!("{rel}:{}: concrete type `{concrete}`: {line}", i + 1));
                }
            }
        }
    }

    assert!(
        violations.is_empty(),
        "Found concrete adapter types in services: use port trait bounds instead:\n{}",
        violations.join("\n")
    );
}

#[test]
fn infra_has_no_print_macros_outside_tests() {
    let mut violations: Vec<String> = Vec::new();

    for file in collect_rs_files(&src_dir(&["infra"])) {
        let rel = rel(&file);
        let Ok(content) = std::fs::read_to_string(&file) else {
            continue;
        };

        let mut tracker = CfgTestTracker::new();
        for (i, line) in content.lines().enumerate() {
            let in_test = tracker.process_line(line);
            let trimmed = line.trim();
            if in_test || trimmed.starts_with("//") {
                continue;
            }
            if line.contains("println!") || line.contains("eprintln!") {
                violations.push(format!(
                    "{rel}:{}: print macro in infra/ outside #[cfg(test)]: {line}",
                    i + 1
                ));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "infra/ must not use println!/eprintln! outside #[cfg(test)]:\n{}",
        violations.join("\n")
    );
}

// ── Command handlers accept unified AppContext ────────────────────────────────

#[test]
fn command_handlers_accept_app_context() {
    let mut violations: Vec<String> = Vec::new();

    for file in collect_rs_files(&src_dir(&["commands"])) {
        let Ok(content) = std::fs::read_to_string(&file) else {
            continue;
        };
        if content.contains("pub async fn run(") || content.contains("pub fn run(") {
            let takes_app = content
                .lines()
                .filter(|l| l.contains("fn run("))
                .all(|l| l.contains("app: &AppContext"));
            if !takes_app {
                violations.push(rel(&file));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "command run() handlers must take `app: &AppContext`:\n{}",
        violations.join("\n")
    );
}
