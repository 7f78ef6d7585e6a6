use std::{
    ffi::OsStr,
    io,
    sync::{Mutex, MutexGuard, PoisonError},
};

use test_casing::test_casing;

use crate::{Invocation, InvokeErrorKind};


/// Serializes spawning so that no child inherits a write handle to a freshly written script
/// (which would make executing it fail with `ETXTBSY`).
pub(crate) fn spawn_lock() -> MutexGuard<'static, ()> {
    static LOCK: Mutex<()> = Mutex::new(());
    LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Paths that must reach the tool unchanged.
const PATH_CASES: [(&str, &str, &str); 4] = [
    ("agave.ttf", "char.txt", "aaa.ttf"),
    ("fonts/My Font.otf", "chars list.txt", "out dir/subset.otf"),
    ("a=b.ttf", "--weird.txt", "x=y=z.ttf"),
    ("шрифт.ttf", "符号.txt", "/tmp/😀.woff2"),
];

#[test_casing(4, PATH_CASES)]
fn building_argv(input: &str, chars: &str, output: &str) {
    let invocation = Invocation::new(input, chars, output);
    let argv = invocation.argv();
    assert_eq!(argv.len(), 4);
    assert_eq!(argv[0], "pyftsubset");
    assert_eq!(argv[1], input);
    assert_eq!(argv[2], format!("--text-file={chars}").as_str());
    assert_eq!(argv[3], format!("--output-file={output}").as_str());

    let command = invocation.command();
    let command_argv: Vec<_> = [command.get_program()]
        .into_iter()
        .chain(command.get_args())
        .map(OsStr::to_os_string)
        .collect();
    assert_eq!(command_argv, argv);
}

#[test]
fn argv_for_default_paths() {
    let invocation = Invocation::new("agave.ttf", "char.txt", "aaa.ttf");
    assert_eq!(invocation, Invocation::default());
    assert_eq!(
        invocation.argv(),
        [
            "pyftsubset",
            "agave.ttf",
            "--text-file=char.txt",
            "--output-file=aaa.ttf"
        ]
    );
}

#[test]
fn overriding_tool_keeps_args() {
    let invocation = Invocation::default();
    let custom = invocation.clone().with_tool("/opt/fonttools/bin/pyftsubset");
    assert_eq!(custom.tool(), "/opt/fonttools/bin/pyftsubset");
    assert_eq!(custom.args(), invocation.args());
}

#[test]
fn missing_tool_is_spawn_error() {
    let _guard = spawn_lock();
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.ttf");
    let invocation = Invocation::new("agave.ttf", "char.txt", &output)
        .with_tool("subset-invoker-test-nonexistent-tool");

    let err = invocation.run().unwrap_err();
    let InvokeErrorKind::Spawn(io_err) = err.kind() else {
        panic!("unexpected error: {err:?}");
    };
    assert_eq!(io_err.kind(), io::ErrorKind::NotFound);
    assert_eq!(err.exit_code(), 127);
    assert!(!output.exists());

    let err = invocation.tool_version().unwrap_err();
    assert!(matches!(err.kind(), InvokeErrorKind::Spawn(_)), "{err:?}");
}
