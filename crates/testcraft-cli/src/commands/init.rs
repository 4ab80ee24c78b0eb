//! The `testcraft init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("testcraft.toml").exists() {
        println!("testcraft.toml already exists, skipping.");
    } else {
        std::fs::write("testcraft.toml", SAMPLE_CONFIG)?;
        println!("Created testcraft.toml");
    }

    std::fs::create_dir_all("test-sets")?;
    let example_path = std::path::Path::new("test-sets/example.toml");
    if example_path.exists() {
        println!("test-sets/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_TEST_SET)?;
        println!("Created test-sets/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: testcraft validate --test-set test-sets/example.toml");
    println!("  2. Run: testcraft preview --test-set test-sets/example.toml");
    println!("  3. Write answers.json, then run:");
    println!("     testcraft take --test-set test-sets/example.toml --answers answers.json");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# testcraft configuration

test_sets_dir = "./test-sets"
output_dir = "./testcraft-reports"
session_ttl_hours = 24
recent_tests_limit = 10

[[users]]
username = "testuser"
email = "test@example.com"
name = "Test User"

[[users]]
username = "adminuser"
email = "admin@example.com"
name = "Admin User"
"#;

const EXAMPLE_TEST_SET: &str = r#"[test]
id = "example"
title = "Example Quiz"
description = "A short quiz to get started"

[[questions]]
id = "intro"
type = "section"
title = "Warm-up"
description = "Two quick questions"

[[questions]]
id = "capital"
type = "choice"
title = "What is the capital of France?"
required = true
score = 10

[[questions.options]]
id = "paris"
text = "Paris"
correct = true

[[questions.options]]
id = "lyon"
text = "Lyon"

[[questions]]
id = "enjoyment"
type = "rating"
title = "How much did you enjoy this quiz?"
maxRating = 5

[questions.labels]
start = "Not at all"
end = "A lot"
"#;
