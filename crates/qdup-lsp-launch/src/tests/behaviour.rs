//! Behaviour-driven tests for the launcher.

use std::process::ExitCode;
use std::sync::{Arc, Mutex, PoisonError};

use qdup_lsp_config::Config;
use qdup_lsp_locator::{ServerCommand, bundled_archive_path, bundled_script_path};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

use super::{locator, touch};
use crate::launch::MockServerRunner;
use crate::{ServerExit, StaticConfigLoader, run_with};

// ---------------------------------------------------------------------------
// Test world
// ---------------------------------------------------------------------------

struct TestWorld {
    install: TempDir,
    config: Config,
    server_status: i32,
    launched: Arc<Mutex<Vec<ServerCommand>>>,
    exit: Option<ExitCode>,
}

impl Default for TestWorld {
    fn default() -> Self {
        let install = TempDir::new().expect("create install dir");
        let config = Config {
            install_dir: Some(install.path().to_path_buf()),
            ..Config::default()
        };
        Self {
            install,
            config,
            server_status: 0,
            launched: Arc::default(),
            exit: None,
        }
    }
}

#[fixture]
fn world() -> TestWorld {
    TestWorld::default()
}

fn unquote(value: &str) -> &str {
    value.trim_matches('"')
}

fn launched(world: &TestWorld) -> Vec<ServerCommand> {
    world
        .launched
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

// ---------------------------------------------------------------------------
// Given steps
// ---------------------------------------------------------------------------

#[given("the bundled archive is installed")]
fn given_bundled_archive(world: &mut TestWorld) {
    touch(&bundled_archive_path(world.install.path()));
}

#[given("the bundled script is installed")]
fn given_bundled_script(world: &mut TestWorld) {
    touch(&bundled_script_path(world.install.path()));
}

#[given("an archive named {name} is configured")]
fn given_configured_archive(world: &mut TestWorld, name: String) {
    let archive = world.install.path().join(unquote(&name));
    touch(&archive);
    world.config.jar_path = Some(archive);
}

#[given("the server exits with status {status}")]
fn given_server_status(world: &mut TestWorld, status: i32) {
    world.server_status = status;
}

// ---------------------------------------------------------------------------
// When steps
// ---------------------------------------------------------------------------

#[when("the launcher runs")]
fn when_launcher_runs(world: &mut TestWorld) {
    let status = world.server_status;
    let launched = Arc::clone(&world.launched);
    let mut runner = MockServerRunner::new();
    runner.expect_run().returning(move |command| {
        launched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(command.clone());
        Ok(ServerExit::new(Some(status)))
    });
    let loader = StaticConfigLoader::new(world.config.clone());
    let mut stderr = Vec::new();

    world.exit = Some(run_with(&loader, &locator(), &runner, &[], &mut stderr));
}

// ---------------------------------------------------------------------------
// Then steps
// ---------------------------------------------------------------------------

#[then("the bundled archive was launched")]
fn then_bundled_archive_launched(world: &mut TestWorld) {
    let archive = bundled_archive_path(world.install.path());
    assert_eq!(launched(world), vec![ServerCommand::archive("java", &archive)]);
}

#[then("the configured archive {name} was launched")]
fn then_configured_archive_launched(world: &mut TestWorld, name: String) {
    let archive = world.install.path().join(unquote(&name));
    assert_eq!(launched(world), vec![ServerCommand::archive("java", &archive)]);
}

#[then("nothing was launched")]
fn then_nothing_launched(world: &mut TestWorld) {
    assert!(launched(world).is_empty());
}

#[then("the launcher exits with status {status}")]
fn then_exit_status(world: &mut TestWorld, status: u8) {
    assert_eq!(world.exit, Some(ExitCode::from(status)));
}

#[then("the launcher fails")]
fn then_launcher_fails(world: &mut TestWorld) {
    assert_eq!(world.exit, Some(ExitCode::FAILURE));
}

// ---------------------------------------------------------------------------
// Scenario registration
// ---------------------------------------------------------------------------

#[scenario(path = "tests/features/launcher.feature")]
fn launcher_behaviour(world: TestWorld) {
    let _ = world;
}
