//! `qdup-lsp`: resolves and runs the qDup language server.

use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stderr = io::stderr().lock();
    qdup_lsp_launch::run(std::env::args_os(), &mut stderr)
}
