//! Lint: `next_unit_cost` is only ever written by the recompute path.
//!
//! A generator's displayed price is derived from its count. Any code that
//! assigns the field directly can let the two drift apart, so this test
//! scans `src/economy/` and flags assignments outside `recompute_cost`.
//!
//! Construction (`next_unit_cost: 0.0` in a struct literal) is not an
//! assignment and is allowed.

use std::fs;
use std::path::Path;

/// Function allowed to write the field.
const RECOMPUTE_FN: &str = "fn recompute_cost";

/// True if the line assigns `next_unit_cost` (plain or compound).
fn assigns_cost(line: &str) -> bool {
    let Some(pos) = line.find("next_unit_cost") else {
        return false;
    };
    let rest = line[pos + "next_unit_cost".len()..].trim_start();
    let Some(op) = rest.chars().next() else {
        return false;
    };
    match op {
        '=' => !rest.starts_with("=="),
        '+' | '-' | '*' | '/' => rest[1..].starts_with('='),
        _ => false,
    }
}

/// Scan source for assignments outside the recompute function body.
fn find_cost_assignments(source: &str) -> Vec<(usize, String)> {
    let mut violations = Vec::new();
    let mut in_recompute = false;
    let mut depth: i32 = 0;

    for (line_num_0, line) in source.lines().enumerate() {
        let trimmed = line.trim();

        if trimmed.starts_with("//") {
            continue;
        }

        if !in_recompute && trimmed.contains(RECOMPUTE_FN) {
            in_recompute = true;
            depth = 0;
        }

        if assigns_cost(trimmed) && !in_recompute {
            violations.push((line_num_0 + 1, trimmed.to_string()));
        }

        if in_recompute {
            depth += trimmed.matches('{').count() as i32;
            depth -= trimmed.matches('}').count() as i32;
            if depth <= 0 && trimmed.contains('}') {
                in_recompute = false;
            }
        }
    }

    violations
}

#[test]
fn next_unit_cost_only_written_by_recompute() {
    let economy_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("src/economy");
    let mut all_violations = Vec::new();

    visit_source_files(&economy_dir, &mut all_violations);

    if !all_violations.is_empty() {
        let mut msg = String::from(
            "Found direct writes to next_unit_cost.\n\
             Change the count and call recompute_cost() instead.\n\n",
        );
        for (file, line_num, line) in &all_violations {
            msg.push_str(&format!("  {}:{}: {}\n", file, line_num, line));
        }
        panic!("{}", msg);
    }
}

fn visit_source_files(dir: &Path, violations: &mut Vec<(String, usize, String)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            visit_source_files(&path, violations);
        } else if path.extension().map(|e| e == "rs").unwrap_or(false) {
            let Ok(source) = fs::read_to_string(&path) else {
                continue;
            };
            let display_path = path.display().to_string();
            for (line_num, line) in find_cost_assignments(&source) {
                violations.push((display_path.clone(), line_num, line));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_direct_assignment() {
        let source = "fn cheat(g: &mut Generator) {\n    g.next_unit_cost = 1.0;\n}";
        let violations = find_cost_assignments(source);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].0, 2);
    }

    #[test]
    fn detects_compound_assignment() {
        let source = "g.next_unit_cost *= 2.0;";
        assert_eq!(find_cost_assignments(source).len(), 1);
    }

    #[test]
    fn allows_recompute_body() {
        let source = "fn recompute_cost(&mut self) {\n    self.next_unit_cost = self.quote(1);\n}";
        assert!(find_cost_assignments(source).is_empty());
    }

    #[test]
    fn recompute_scope_ends_with_its_body() {
        let source = "fn recompute_cost(&mut self) {\n    self.next_unit_cost = self.quote(1);\n}\n\
                      fn other(&mut self) {\n    self.next_unit_cost = 0.0;\n}";
        assert_eq!(find_cost_assignments(source).len(), 1);
    }

    #[test]
    fn allows_reads_and_comparisons() {
        let source = "let c = g.next_unit_cost();\nassert!(g.next_unit_cost == 5.0);\nnext_unit_cost: 0.0,";
        assert!(find_cost_assignments(source).is_empty());
    }

    #[test]
    fn ignores_comments() {
        let source = "// g.next_unit_cost = 1.0;";
        assert!(find_cost_assignments(source).is_empty());
    }
}
