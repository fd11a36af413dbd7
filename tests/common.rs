use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub const RELEASES_PATH: &str = "/repos/theseus-rs/postgresql-binaries/releases";

pub const CI_WORKFLOW: &str = r#"name: CI
on: [push, pull_request]
jobs:
  test:
    strategy:
      matrix:
        pg_version: ["17.6.1", "13.22.0"]
    steps:
      - run: mise use -g postgres-binary:postgres@13.22.0
"#;

pub const DOCKER_BAKE: &str = r#"variable "PG_VERSIONS" {
  default = {
    pg13 = "13.22.0"
    pg17 = "17.6.1"
  }
}

target "postgres" {
  matrix = { pg = keys(PG_VERSIONS) }
}
"#;

pub const MISE_TOML: &str = r#"[tasks.test-version-matrix]
run = '''
VERSIONS=("13.22.0" "17.6.1")
'''
"#;

pub const DOCKERFILE: &str = "FROM debian:bookworm-slim\nARG POSTGRES_VERSION=13.22.0\n";

pub const RELEASES_BODY: &str = r#"[
    {"tag_name": "18.2.0"},
    {"tag_name": "17.6.1"},
    {"tag_name": "16.10.0"},
    {"tag_name": "15.14.0"},
    {"tag_name": "14.19.0"},
    {"tag_name": "13.22.0"},
    {"tag_name": "12.5.0"}
]"#;

/// A throwaway repository checkout plus a CI output file.
pub struct TestContext {
    _temp_dir: TempDir,
    pub root: PathBuf,
    pub github_output: PathBuf,
    pub bin_path: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().join("repo");
        fs::create_dir_all(&root).expect("Failed to create repo dir");
        let github_output = temp_dir.path().join("github_output");

        Self {
            root,
            github_output,
            bin_path: PathBuf::from(env!("CARGO_BIN_EXE_pg-version-sync")),
            _temp_dir: temp_dir,
        }
    }

    /// Seed the checkout with stale versions in every target file.
    pub fn with_stale_checkout(self) -> Self {
        self.write(
            ".versions.json",
            "{\n  \"newest\": \"17.6.1\",\n  \"oldest\": \"13.22.0\"\n}\n",
        );
        self.write(".github/workflows/ci.yml", CI_WORKFLOW);
        self.write("docker/docker-bake.hcl", DOCKER_BAKE);
        self.write("mise.toml", MISE_TOML);
        self.write("docker/Dockerfile.pg13", DOCKERFILE);
        self.write("docker/Dockerfile.pg17", DOCKERFILE);
        self
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(path, content).expect("Failed to write fixture");
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.root.join(rel)).expect("Failed to read fixture")
    }

    pub fn github_output(&self) -> String {
        fs::read_to_string(&self.github_output).unwrap_or_default()
    }

    /// Snapshot of every file in the checkout, for before/after comparisons.
    pub fn snapshot(&self) -> Vec<(PathBuf, String)> {
        let mut files = Vec::new();
        collect_files(&self.root, &self.root, &mut files);
        files.sort();
        files
    }

    pub fn cmd(&self, api_url: &str) -> Command {
        let mut cmd = Command::new(&self.bin_path);
        cmd.arg("--root").arg(&self.root);
        cmd.env("PG_VERSION_SYNC_API_URL", api_url);
        cmd.env("GITHUB_OUTPUT", &self.github_output);
        cmd.env_remove("GITHUB_TOKEN");
        cmd.env_remove("GH_TOKEN");
        cmd.env_remove("PG_VERSION_SYNC_VARIANT");
        cmd.env_remove("RUST_LOG");
        cmd
    }
}

fn collect_files(root: &Path, dir: &Path, out: &mut Vec<(PathBuf, String)>) {
    for entry in fs::read_dir(dir).expect("Failed to read dir") {
        let path = entry.expect("Failed to read entry").path();
        if path.is_dir() {
            collect_files(root, &path, out);
        } else {
            let content = fs::read_to_string(&path).expect("Failed to read file");
            out.push((path.strip_prefix(root).unwrap().to_path_buf(), content));
        }
    }
}

#[allow(dead_code)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub status: std::process::ExitStatus,
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            status: output.status,
        }
    }
}

#[allow(dead_code)]
impl CommandOutput {
    pub fn assert_success(&self) -> &Self {
        if !self.status.success() {
            panic!(
                "Command failed with status {:?}\nstdout: {}\nstderr: {}",
                self.status.code(),
                self.stdout,
                self.stderr
            );
        }
        self
    }

    pub fn assert_exit_code(&self, code: i32) -> &Self {
        assert_eq!(
            self.status.code(),
            Some(code),
            "Unexpected exit code\nstdout: {}\nstderr: {}",
            self.stdout,
            self.stderr
        );
        self
    }

    pub fn assert_stdout_contains(&self, text: &str) -> &Self {
        assert!(
            self.stdout.contains(text),
            "Stdout did not contain '{}'\nActual stdout: {}",
            text,
            self.stdout
        );
        self
    }

    pub fn assert_stderr_contains(&self, text: &str) -> &Self {
        assert!(
            self.stderr.contains(text),
            "Stderr did not contain '{}'\nActual stderr: {}",
            text,
            self.stderr
        );
        self
    }
}
