// src/exec/command.rs

//! Description of an external process to invoke.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

/// Everything needed to start one external process.
///
/// The program path is used as given; resolving a bare name against `PATH`
/// is the caller's job (see [`find_in_path`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub current_dir: Option<PathBuf>,
    pub env: Vec<(OsString, OsString)>,
}

impl ProcessSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Program path as a display string for logging.
    pub fn program_display(&self) -> String {
        self.program.display().to_string()
    }

    /// Argument vector as lossy strings for logging.
    pub fn args_display(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// Build a `tokio` command with both output streams piped and stdin
    /// closed.
    pub(crate) fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        cmd
    }
}

/// Look up an executable by name in the directories listed in `PATH`.
///
/// Names containing a path separator are returned unchanged if they point
/// at a file.
pub fn find_in_path(binary: &str) -> Option<PathBuf> {
    if binary.contains(std::path::MAIN_SEPARATOR) {
        let path = Path::new(binary);
        return path.is_file().then(|| path.to_path_buf());
    }

    let path_var = std::env::var_os("PATH")?;
    for segment in std::env::split_paths(&path_var) {
        let candidate = segment.join(binary);
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_args_dir_and_env() {
        let spec = ProcessSpec::new("/bin/echo")
            .arg("a")
            .args(["b", "c"])
            .current_dir("/tmp")
            .env("FOO", "bar");

        assert_eq!(spec.program_display(), "/bin/echo");
        assert_eq!(spec.args_display(), vec!["a", "b", "c"]);
        assert_eq!(spec.current_dir.as_deref(), Some(Path::new("/tmp")));
        assert_eq!(spec.env, vec![(OsString::from("FOO"), OsString::from("bar"))]);
    }

    #[cfg(unix)]
    #[test]
    fn finds_sh_on_path() {
        let sh = find_in_path("sh").expect("sh should be on PATH");
        assert!(sh.ends_with("sh"));
    }

    #[test]
    fn missing_binary_is_none() {
        assert!(find_in_path("deployexec-no-such-binary").is_none());
    }
}
