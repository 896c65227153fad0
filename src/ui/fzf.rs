//! fzf selector implementation

use crate::types::MenuItem;
use std::io::Write;
use std::process::{Command, Stdio};

pub struct FzfSelector;

/// One entry per line, prefixed with its index and a tab
fn build_input<T>(items: &[MenuItem<T>]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}\t{}", i, item.label.replace('\n', " ")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Recover the index from the line fzf echoes back
fn parse_selection(line: &str) -> Option<usize> {
    line.trim().split('\t').next()?.parse().ok()
}

impl FzfSelector {
    pub fn select<T: Clone>(
        &self,
        items: &[MenuItem<T>],
        prompt: &str,
        header: Option<&str>,
    ) -> Option<T> {
        if items.is_empty() {
            return None;
        }

        let prompt_arg = format!("{} > ", prompt);
        let mut args = vec![
            "--prompt", prompt_arg.as_str(),
            "--height", "50%",
            "--reverse",
            "--ansi",
            "--no-sort",
            "--delimiter", "\t",
            "--with-nth", "2..", // Show only the label
        ];
        if let Some(header) = header {
            args.extend(["--header", header]);
        }

        let mut child = Command::new("fzf")
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .ok()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(build_input(items).as_bytes()).ok()?;
        }

        let output = child.wait_with_output().ok()?;

        if !output.status.success() {
            return None; // User cancelled
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let index = parse_selection(&stdout)?;

        items.get(index).map(|item| item.value.clone())
    }

    pub fn is_available() -> bool {
        Command::new("which")
            .arg("fzf")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_roundtrips_index() {
        let items = vec![
            MenuItem {
                label: "Load more".to_string(),
                value: 1,
            },
            MenuItem {
                label: "two\nlines".to_string(),
                value: 2,
            },
        ];
        let input = build_input(&items);
        let lines: Vec<&str> = input.lines().collect();
        assert_eq!(lines, vec!["0\tLoad more", "1\ttwo lines"]);
        assert_eq!(parse_selection(&format!("{}\n", lines[1])), Some(1));
        assert_eq!(parse_selection(""), None);
    }
}
