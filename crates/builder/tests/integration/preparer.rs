//! Source package preparation tests

use super::support::{drain, read, Compression, RecordingRunner, Workspace, OLD_CHANGELOG};
use debforge_builder::BuildContext;
use debforge_changelog::Changelog;
use debforge_errors::{BuildError, Error};
use debforge_events::{AppEvent, BuildEvent, GeneralEvent};
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

#[tokio::test]
async fn prepare_stages_sources_and_records_descriptor() {
    let ws = Workspace::new(Compression::Gzip).await;
    let runner = Arc::new(RecordingRunner::default());
    let mut preparer = ws.preparer(runner.clone(), BuildContext::new("hello"));

    assert!(preparer.source_package_path().is_none());
    assert_eq!(preparer.prepare().await.unwrap(), 0);

    // sources unpacked with their top-level directory
    assert_eq!(read(&ws.tree().join("README")), "Hello, world.\n");

    // orig copied byte for byte under its canonical name
    let orig = ws.build_dir().join("hello_1.0+abc123.orig.tar.gz");
    assert_eq!(
        std::fs::read(&orig).unwrap(),
        std::fs::read(&ws.tarball).unwrap()
    );

    // template copied into the tree
    assert_eq!(read(&ws.tree().join("debian/control")), "Source: hello\n");
    assert_eq!(
        read(&ws.tree().join("debian/source/format")),
        "3.0 (quilt)\n"
    );

    // new block on top, old block untouched
    let changelog_text = read(&ws.tree().join("debian/changelog"));
    assert!(changelog_text.ends_with(OLD_CHANGELOG));
    let changelog = Changelog::parse(&changelog_text).unwrap();
    let newest = changelog.latest().unwrap();
    assert_eq!(changelog.blocks().len(), 2);
    assert_eq!(newest.version(), "1.0+abc123-1");
    assert_eq!(newest.distributions(), ["unstable"]);
    assert_eq!(newest.urgency(), Some("low"));
    assert_eq!(newest.author(), "Builder <builder@example.org>");
    assert_eq!(newest.date(), "Tue, 05 Mar 2024 12:00:00 +0100");
    assert!(newest.raw().contains("  * Automated build\n"));

    // dpkg-buildpackage in the tree root with the project environment
    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program(), "dpkg-buildpackage");
    assert_eq!(calls[0].get_args(), ["-us", "-uc", "-S"]);
    assert_eq!(calls[0].get_current_dir(), Some(ws.tree().as_path()));
    let envs = calls[0].get_envs();
    for (key, value) in [
        ("PROJECT_NAME", "hello"),
        ("PROJECT_VERSION", "1.0"),
        ("PROJECT_REVISION", "4711"),
        ("PATH", "/usr/bin"),
    ] {
        assert!(envs.contains(&(key.to_string(), value.to_string())), "{key}");
    }

    assert_eq!(
        preparer.source_package_path(),
        Some(ws.build_dir().join("hello_1.0+abc123-1.dsc").as_path())
    );
}

#[tokio::test]
async fn bzip2_orig_keeps_its_extension() {
    let ws = Workspace::new(Compression::Bzip2).await;
    let mut preparer = ws.preparer(Arc::default(), BuildContext::new("hello"));

    assert_eq!(preparer.prepare().await.unwrap(), 0);
    assert!(ws
        .build_dir()
        .join("hello_1.0+abc123.orig.tar.bz2")
        .is_file());
    assert_eq!(read(&ws.tree().join("src/main.c")), "int main(void) { return 0; }\n");
}

#[tokio::test]
async fn xz_tarball_is_rejected_before_staging() {
    let ws = Workspace::new(Compression::Gzip).await.with_tarball_name("hello-1.0.tar.xz");
    let runner = Arc::new(RecordingRunner::default());
    let mut preparer = ws.preparer(runner.clone(), BuildContext::new("hello"));

    let err = preparer.prepare().await.unwrap_err();
    assert!(matches!(
        err,
        Error::Build(BuildError::UnsupportedArchiveFormat { .. })
    ));
    assert!(!ws.work_dir.exists());
    assert!(runner.calls().is_empty());
    assert!(preparer.source_package_path().is_none());
}

#[tokio::test]
async fn failed_source_build_leaves_no_descriptor() {
    let ws = Workspace::new(Compression::Gzip).await;
    let runner = Arc::new(RecordingRunner::default().with_code("dpkg-buildpackage", 2));
    let (tx, mut rx) = debforge_events::channel();
    let mut preparer = ws.preparer(runner, BuildContext::new("hello").with_event_sender(tx));

    assert_eq!(preparer.prepare().await.unwrap(), 2);
    assert!(preparer.source_package_path().is_none());

    let events = drain(&mut rx);
    assert!(events.iter().any(|event| matches!(
        event,
        AppEvent::General(GeneralEvent::Warning { message, .. })
            if message.contains("exited with code 2")
    )));
    assert!(!events
        .iter()
        .any(|event| matches!(event, AppEvent::Build(BuildEvent::SourcePackageReady { .. }))));
}

#[tokio::test]
async fn second_prepare_refuses_to_overwrite_debian_dir() {
    let ws = Workspace::new(Compression::Gzip).await;
    let mut preparer = ws.preparer(Arc::default(), BuildContext::new("hello"));
    assert_eq!(preparer.prepare().await.unwrap(), 0);

    let err = preparer.prepare().await.unwrap_err();
    assert_eq!(err.io_kind(), Some(ErrorKind::AlreadyExists));
    assert!(preparer.source_package_path().is_none());
}

#[tokio::test]
async fn missing_template_is_io_error() {
    let ws = Workspace::new(Compression::Gzip).await;
    std::fs::remove_dir_all(&ws.template).unwrap();
    let mut preparer = ws.preparer(Arc::default(), BuildContext::new("hello"));

    let err = preparer.prepare().await.unwrap_err();
    assert_eq!(err.io_kind(), Some(ErrorKind::NotFound));
}

#[tokio::test]
async fn prepare_succeeds_after_template_is_restored() {
    let ws = Workspace::new(Compression::Gzip).await;
    let stash = ws.temp.path().join("stash");
    std::fs::rename(&ws.template, &stash).unwrap();
    let mut preparer = ws.preparer(Arc::default(), BuildContext::new("hello"));

    let err = preparer.prepare().await.unwrap_err();
    assert_eq!(err.io_kind(), Some(ErrorKind::NotFound));
    assert!(!ws.tree().join("debian").exists());

    std::fs::rename(&stash, &ws.template).unwrap();
    assert_eq!(preparer.prepare().await.unwrap(), 0);
    assert_eq!(read(&ws.tree().join("debian/control")), "Source: hello\n");
    assert!(preparer.source_package_path().is_some());
}

#[tokio::test]
async fn computed_names_follow_revision() {
    let ws = Workspace::new(Compression::Gzip).await;
    let preparer = ws.preparer(Arc::default(), BuildContext::new("hello"));

    assert_eq!(preparer.package_version(), "1.0+abc123-1");
    assert_eq!(preparer.source_tree(), ws.tree());
    assert_eq!(
        preparer.environment().get("PROJECT_NAME"),
        Some("hello")
    );
    assert!(Path::new(&ws.project().package_template).is_dir());
}
