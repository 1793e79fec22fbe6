//! Shared fixtures: a scratch directory holding a fake compiler and a fake simulator.
//!
//! The fake compiler reads its behaviour from the source file. A line `<stage>=<code>` makes that
//! stage exit with `<code>`; every other stage exits 0. In `-gen` mode the `program=` lines are
//! written to the artifact, which the fake simulator then runs as a shell script.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use automark::{CommandLine, Toolchain};
use tempfile::TempDir;

pub const FAKE_COMPILER: &str = r#"mode="${1#-}"
src="$2"
out="$3"
[ -f "$src" ] || exit 2
code=$(sed -n "s/^$mode=//p" "$src")
if [ "$mode" = gen ]; then
    sed -n 's/^program=//p' "$src" > "$out"
fi
exit "${code:-0}"
"#;

pub const FAKE_SIMULATOR: &str = r#"exec sh "$2"
"#;

pub const FIBONACCI: &str =
    "First 12 terms of Fibonacci series are : 0 1 1 2 3 5 8 13 21 34 55 89 \n";

/// A generated program that reads a count and prints the fibonacci banner.
pub const FIBONACCI_PROGRAM: &str =
    r#"program=read n; printf 'First %s terms of Fibonacci series are : 0 1 1 2 3 5 8 13 21 34 55 89 \n' "$n""#;

pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create scratch dir");
        fs::write(dir.path().join("fakecc.sh"), FAKE_COMPILER).expect("write fake compiler");
        fs::write(dir.path().join("fakesim.sh"), FAKE_SIMULATOR).expect("write fake simulator");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes a source file whose lines script the fake compiler and the generated program.
    pub fn source(&self, name: &str, lines: &[&str]) -> PathBuf {
        let path = self.path().join(name);
        let mut body = lines.join("\n");
        body.push('\n');
        fs::write(&path, body).expect("write source");
        path
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path().join(name);
        fs::write(&path, content).expect("write file");
        path
    }

    /// A toolchain using absolute paths, usable from any working directory.
    pub fn toolchain(&self) -> Toolchain {
        Toolchain {
            compiler: CommandLine::new("sh").with_path(&self.path().join("fakecc.sh")),
            simulator: CommandLine::new("sh")
                .with_path(&self.path().join("fakesim.sh"))
                .arg("nc"),
            artifact: self.path().join("dummy.out"),
            timeout: Some(Duration::from_secs(10)),
            verbose: false,
        }
    }
}
