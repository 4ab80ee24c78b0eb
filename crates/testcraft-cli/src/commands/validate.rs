//! The `testcraft validate` command.

use std::path::PathBuf;

use anyhow::Result;

use testcraft_core::parser::{load_tests, validate_test};

pub fn execute(test_set_path: PathBuf) -> Result<()> {
    let tests = load_tests(&test_set_path)?;

    let mut total_warnings = 0;

    for test in &tests {
        println!("Test: {} ({} questions)", test.title, test.questions.len());

        let warnings = validate_test(test);
        for w in &warnings {
            let prefix = w
                .question_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All test sets valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
