use std::fs;

use cucumber::{given, then, when};
use tempfile::TempDir;

use coredesk::cli::run_from_args_with_output;

use crate::step_definitions::world::CoreDeskWorld;

fn run_cli(world: &mut CoreDeskWorld, command: &str) {
    let args = shell_words::split(command).expect("parse command");
    let cwd = world
        .working_directory
        .as_ref()
        .expect("working directory not set");

    match run_from_args_with_output(args, cwd.as_path()) {
        Ok(output) => {
            world.exit_code = Some(0);
            world.stdout = Some(output.stdout);
            world.stderr = Some(String::new());
        }
        Err(error) => {
            world.exit_code = Some(1);
            world.stdout = Some(String::new());
            world.stderr = Some(error.to_string());
        }
    }
}

#[given("an empty working directory")]
fn given_empty_working_directory(world: &mut CoreDeskWorld) {
    let temp_dir = TempDir::new().expect("tempdir");
    let root = temp_dir.path().join("desk");
    fs::create_dir_all(&root).expect("create working directory");
    world.working_directory = Some(root);
    world.temp_dir = Some(temp_dir);
}

#[given(expr = "a configuration file containing {string}")]
fn given_configuration_file(world: &mut CoreDeskWorld, contents: String) {
    let root = world.working_directory.as_ref().expect("working directory");
    fs::write(root.join(".coredesk.yml"), contents.replace("\\n", "\n")).expect("write config");
}

#[when(expr = "I run {string}")]
fn when_i_run(world: &mut CoreDeskWorld, command: String) {
    run_cli(world, &command);
}

#[then("the command succeeds")]
fn then_command_succeeds(world: &mut CoreDeskWorld) {
    assert_eq!(world.exit_code, Some(0), "stderr: {:?}", world.stderr);
}

#[then(expr = "the command fails with {string}")]
fn then_command_fails_with(world: &mut CoreDeskWorld, message: String) {
    assert_eq!(world.exit_code, Some(1));
    assert_eq!(world.stderr.as_deref(), Some(message.as_str()));
}

#[then(expr = "stdout contains {string}")]
fn then_stdout_contains(world: &mut CoreDeskWorld, text: String) {
    let stdout = world.stdout.as_deref().unwrap_or_default();
    assert!(stdout.contains(&text), "stdout: {stdout}");
}

#[then(expr = "stdout does not contain {string}")]
fn then_stdout_does_not_contain(world: &mut CoreDeskWorld, text: String) {
    let stdout = world.stdout.as_deref().unwrap_or_default();
    assert!(!stdout.contains(&text), "stdout: {stdout}");
}

#[then(expr = "stdout has {int} lines")]
fn then_stdout_line_count(world: &mut CoreDeskWorld, count: usize) {
    let stdout = world.stdout.as_deref().unwrap_or_default();
    assert_eq!(stdout.lines().count(), count, "stdout: {stdout}");
}
