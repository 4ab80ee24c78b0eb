//! The `testcraft preview` command.

use std::path::PathBuf;

use anyhow::Result;

use testcraft_core::parser::load_tests;
use testcraft_core::session::preview_lines;

pub fn execute(test_set_path: PathBuf) -> Result<()> {
    let tests = load_tests(&test_set_path)?;
    if tests.is_empty() {
        anyhow::bail!("no tests found in {}", test_set_path.display());
    }

    for (i, test) in tests.iter().enumerate() {
        if i > 0 {
            println!("\n----------------------------------------\n");
        }
        for line in preview_lines(test) {
            println!("{line}");
        }
    }

    Ok(())
}
