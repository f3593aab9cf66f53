//! Fixtures shared by the integration tests

use async_compression::tokio::write::{BzEncoder, GzipEncoder};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, TimeZone};
use debforge_builder::{BuildContext, BuildEnvironment, ChangelogSettings, SourcePackagePreparer};
use debforge_changelog::FileChangelogStore;
use debforge_errors::Error;
use debforge_events::{AppEvent, EventReceiver};
use debforge_platform::{CancellationToken, PlatformCommand, ProcessRunner};
use debforge_types::{FixedRevision, OriginTarball, Project};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::io::AsyncWriteExt;

pub const OLD_CHANGELOG: &str = "\
hello (1.0-1) unstable; urgency=low

  * Initial release.

 -- Jane Doe <jane@example.org>  Fri, 01 Mar 2024 09:30:00 +0100
";

/// Records every command and answers with a per-program exit code
#[derive(Default)]
pub struct RecordingRunner {
    codes: HashMap<String, i32>,
    calls: Mutex<Vec<PlatformCommand>>,
}

impl RecordingRunner {
    pub fn with_code(mut self, program: &str, code: i32) -> Self {
        self.codes.insert(program.to_string(), code);
        self
    }

    pub fn calls(&self) -> Vec<PlatformCommand> {
        self.calls.lock().unwrap().clone()
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|cmd| cmd.program().to_string())
            .collect()
    }
}

#[async_trait]
impl ProcessRunner for RecordingRunner {
    async fn run(&self, cmd: &PlatformCommand, _cancel: &CancellationToken) -> Result<i32, Error> {
        self.calls.lock().unwrap().push(cmd.clone());
        Ok(self.codes.get(cmd.program()).copied().unwrap_or(0))
    }
}

#[derive(Clone, Copy)]
pub enum Compression {
    Gzip,
    Bzip2,
}

/// Scratch layout: an orig tarball, a packaging template and a work dir
pub struct Workspace {
    pub temp: TempDir,
    pub tarball: PathBuf,
    pub template: PathBuf,
    pub work_dir: PathBuf,
}

impl Workspace {
    pub async fn new(compression: Compression) -> Self {
        let temp = tempfile::tempdir().unwrap();
        let tarball = match compression {
            Compression::Gzip => temp.path().join("hello-1.0.tar.gz"),
            Compression::Bzip2 => temp.path().join("hello-1.0.tar.bz2"),
        };
        std::fs::write(&tarball, orig_tarball(compression).await).unwrap();

        let template = temp.path().join("template");
        std::fs::create_dir_all(template.join("source")).unwrap();
        std::fs::write(template.join("changelog"), OLD_CHANGELOG).unwrap();
        std::fs::write(template.join("control"), "Source: hello\n").unwrap();
        std::fs::write(template.join("source/format"), "3.0 (quilt)\n").unwrap();

        let work_dir = temp.path().join("work");

        Self {
            temp,
            tarball,
            template,
            work_dir,
        }
    }

    /// Point the tarball at a file with another suffix
    pub fn with_tarball_name(mut self, name: &str) -> Self {
        let renamed = self.temp.path().join(name);
        std::fs::rename(&self.tarball, &renamed).unwrap();
        self.tarball = renamed;
        self
    }

    pub fn project(&self) -> Project {
        Project::new("hello", "1.0", &self.template, &self.work_dir)
    }

    pub fn build_dir(&self) -> PathBuf {
        self.work_dir.join("build")
    }

    pub fn tree(&self) -> PathBuf {
        self.build_dir().join("hello-1.0")
    }

    pub fn preparer(&self, runner: Arc<RecordingRunner>, context: BuildContext) -> SourcePackagePreparer {
        let revision = revision();
        let environment =
            BuildEnvironment::from_vars([("PATH", "/usr/bin")], &self.project(), &revision);
        SourcePackagePreparer::new(
            self.project(),
            OriginTarball::new(&self.tarball),
            Arc::new(revision),
            changelog_settings(),
            environment,
            runner,
            Arc::new(FileChangelogStore),
            context,
        )
        .with_timestamp(timestamp())
    }
}

pub fn revision() -> FixedRevision {
    FixedRevision {
        revision: "4711".to_string(),
        name: "hello".to_string(),
        version: "1.0".to_string(),
        fancy_revision: "abc123".to_string(),
        checkout_dir_name: "hello-1.0".to_string(),
    }
}

pub fn changelog_settings() -> ChangelogSettings {
    ChangelogSettings {
        distribution: "unstable".to_string(),
        urgency: "low".to_string(),
        author: "Builder <builder@example.org>".to_string(),
        entry: "Automated build".to_string(),
    }
}

pub fn timestamp() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(3600)
        .unwrap()
        .with_ymd_and_hms(2024, 3, 5, 12, 0, 0)
        .unwrap()
}

pub fn drain(rx: &mut EventReceiver) -> Vec<AppEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

async fn orig_tarball(compression: Compression) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (path, contents) in [
        ("hello-1.0/README", "Hello, world.\n"),
        ("hello-1.0/src/main.c", "int main(void) { return 0; }\n"),
    ] {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, path, contents.as_bytes())
            .unwrap();
    }
    let tar = builder.into_inner().unwrap();

    match compression {
        Compression::Gzip => {
            let mut encoder = GzipEncoder::new(Vec::new());
            encoder.write_all(&tar).await.unwrap();
            encoder.shutdown().await.unwrap();
            encoder.into_inner()
        }
        Compression::Bzip2 => {
            let mut encoder = BzEncoder::new(Vec::new());
            encoder.write_all(&tar).await.unwrap();
            encoder.shutdown().await.unwrap();
            encoder.into_inner()
        }
    }
}
