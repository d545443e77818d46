//! Unit tests for the launcher.

mod behaviour;

use std::cell::Cell;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use qdup_lsp_client::{NotificationAction, Notifier};
use qdup_lsp_config::Config;
use qdup_lsp_locator::{
    HostEnvironment, LauncherProbe, ServerCommand, ServerLocator, bundled_archive_path,
};
use rstest::{fixture, rstest};
use tempfile::TempDir;

use crate::launch::{LAUNCH_TARGET, MockServerRunner};
use crate::{
    LaunchError, ServerExit, StaticConfigLoader, SystemConfigLoader, install_dir, launch, run_with,
};

/// Real filesystem with an empty environment and search path, so the
/// host's `JAVA_HOME` and installed launchers do not leak into tests.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct BareHost;

impl HostEnvironment for BareHost {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn var(&self, _key: &str) -> Option<OsString> {
        None
    }
}

impl LauncherProbe for BareHost {
    fn is_on_search_path(&self, _name: &str) -> bool {
        false
    }
}

/// Notifier counting the errors it was asked to show.
#[derive(Debug, Default)]
pub(crate) struct CountingNotifier {
    errors: Cell<usize>,
}

impl CountingNotifier {
    pub(crate) fn errors(&self) -> usize {
        self.errors.get()
    }
}

impl Notifier for CountingNotifier {
    fn show_error(
        &self,
        _message: &str,
        _actions: &[NotificationAction],
    ) -> Option<NotificationAction> {
        self.errors.set(self.errors.get() + 1);
        None
    }

    fn open_settings(&self, _section: &str) {}
}

/// Writes an empty file, creating parent directories.
pub(crate) fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent directories");
    }
    fs::write(path, b"").expect("write file");
}

pub(crate) const fn locator() -> ServerLocator<BareHost, BareHost> {
    ServerLocator::new(BareHost, BareHost)
}

#[fixture]
fn install() -> TempDir {
    TempDir::new().expect("create install dir")
}

fn config_for(install: &TempDir) -> Config {
    Config {
        install_dir: Some(install.path().to_path_buf()),
        ..Config::default()
    }
}

#[rstest]
fn configured_install_dir_wins() {
    let config = Config {
        install_dir: Some(PathBuf::from("/opt/qdup")),
        ..Config::default()
    };

    let dir = install_dir(&config, Ok(PathBuf::from("/usr/bin/qdup-lsp"))).expect("dir");

    assert_eq!(dir, PathBuf::from("/opt/qdup"));
}

#[rstest]
fn install_dir_defaults_to_executable_directory() {
    let dir = install_dir(&Config::default(), Ok(PathBuf::from("/usr/lib/qdup/qdup-lsp")))
        .expect("dir");

    assert_eq!(dir, PathBuf::from("/usr/lib/qdup"));
}

#[rstest]
fn unknown_executable_path_is_an_error() {
    let result = install_dir(&Config::default(), Err(io::Error::other("no /proc")));

    assert!(matches!(result, Err(LaunchError::InstallDir { .. })));
}

#[rstest]
#[case(Some(0), Some(0))]
#[case(Some(3), Some(3))]
#[case(None, None)]
fn server_exit_keeps_status(#[case] code: Option<i32>, #[case] expected: Option<i32>) {
    assert_eq!(ServerExit::new(code).code(), expected);
}

#[rstest]
#[case(Some(0), ExitCode::SUCCESS)]
#[case(Some(7), ExitCode::from(7))]
#[case(Some(300), ExitCode::FAILURE)]
#[case(Some(-1), ExitCode::FAILURE)]
#[case(None, ExitCode::FAILURE)]
fn exit_codes_are_propagated(#[case] code: Option<i32>, #[case] expected: ExitCode) {
    assert_eq!(ServerExit::new(code).exit_code(), expected);
}

#[rstest]
fn bundled_archive_is_run(install: TempDir) {
    let archive = bundled_archive_path(install.path());
    touch(&archive);
    let expected = ServerCommand::archive("java", &archive);
    let mut runner = MockServerRunner::new();
    runner
        .expect_run()
        .withf(move |command| *command == expected)
        .times(1)
        .returning(|_| Ok(ServerExit::new(Some(0))));
    let notifier = CountingNotifier::default();

    let exit = launch(
        &config_for(&install),
        install.path(),
        &locator(),
        &runner,
        &notifier,
    )
    .expect("launch succeeds");

    assert_eq!(exit.code(), Some(0));
    assert_eq!(notifier.errors(), 0);
}

#[rstest]
fn missing_server_notifies_and_skips_runner(install: TempDir) {
    let mut runner = MockServerRunner::new();
    runner.expect_run().never();
    let notifier = CountingNotifier::default();

    let result = launch(
        &config_for(&install),
        install.path(),
        &locator(),
        &runner,
        &notifier,
    );

    assert!(matches!(result, Err(LaunchError::ServerNotFound { .. })));
    assert_eq!(notifier.errors(), 1);
}

#[rstest]
fn run_with_propagates_server_exit_code(install: TempDir) {
    touch(&bundled_archive_path(install.path()));
    let mut runner = MockServerRunner::new();
    runner
        .expect_run()
        .times(1)
        .returning(|_| Ok(ServerExit::new(Some(4))));
    let loader = StaticConfigLoader::new(config_for(&install));
    let mut stderr = Vec::new();

    let code = run_with(&loader, &locator(), &runner, &[], &mut stderr);

    assert_eq!(code, ExitCode::from(4));
    assert!(stderr.is_empty());
}

#[rstest]
fn configuration_failures_are_reported_on_stderr(install: TempDir) {
    let mut runner = MockServerRunner::new();
    runner.expect_run().never();
    let args = [
        OsString::from("qdup-lsp"),
        OsString::from("--config-path"),
        install.path().join("missing.toml").into_os_string(),
    ];
    let mut stderr = Vec::new();

    let code = run_with(&SystemConfigLoader, &locator(), &runner, &args, &mut stderr);

    assert_eq!(code, ExitCode::FAILURE);
    let message = String::from_utf8(stderr).expect("utf8");
    assert!(
        message.starts_with("qdup-lsp: failed to load configuration"),
        "unexpected stderr: {message}"
    );
}

#[rstest]
fn log_target_matches_crate_filter_name() {
    let crate_prefix = concat!(env!("CARGO_CRATE_NAME"), "::");

    assert!(
        LAUNCH_TARGET.starts_with(crate_prefix),
        "{LAUNCH_TARGET} is not matched by a {} filter",
        env!("CARGO_CRATE_NAME")
    );
}
