//! End-to-end orchestrator tests

use super::support::{drain, read, revision, Compression, RecordingRunner, Workspace};
use debforge_builder::{
    BackendConfig, BuildContext, BuildEnvironment, BuildOrchestrator, ChrootBuilder,
};
use debforge_changelog::Changelog;
use debforge_errors::{BuildError, Error};
use debforge_events::{AppEvent, BuildEvent, BuildPhase};
use debforge_types::BackendKind;
use std::sync::Arc;

fn orchestrator(
    ws: &Workspace,
    config: BackendConfig,
    runner: &Arc<RecordingRunner>,
    context: &BuildContext,
) -> BuildOrchestrator {
    let preparer = ws.preparer(runner.clone(), context.clone());
    let environment =
        BuildEnvironment::from_vars([("PATH", "/usr/bin")], &ws.project(), &revision());
    let backend = ChrootBuilder::new(
        config,
        environment,
        ws.build_dir(),
        runner.clone(),
        context.clone(),
    );
    BuildOrchestrator::new(preparer, Box::new(backend), context.clone())
}

fn pbuilder() -> BackendConfig {
    BackendConfig::new("pbuilder", BackendKind::Pbuilder)
        .with_buildbase("/var/cache/pbuilder/base.tgz")
        .with_output_dir("/srv/results")
}

fn phases(events: &[AppEvent]) -> Vec<(BuildPhase, &'static str, Option<i32>)> {
    events
        .iter()
        .filter_map(|event| match event {
            AppEvent::Build(BuildEvent::PhaseStarted { phase, .. }) => {
                Some((*phase, "started", None))
            }
            AppEvent::Build(BuildEvent::PhaseCompleted {
                phase, exit_code, ..
            }) => Some((*phase, "completed", Some(*exit_code))),
            AppEvent::Build(BuildEvent::PhaseFailed { phase, .. }) => {
                Some((*phase, "failed", None))
            }
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn pbuilder_run_returns_chroot_exit_code() {
    let ws = Workspace::new(Compression::Gzip).await;
    let runner = Arc::new(RecordingRunner::default().with_code("pbuilder", 3));
    let (tx, mut rx) = debforge_events::channel();
    let context = BuildContext::new("hello").with_event_sender(tx);

    let mut pipeline = orchestrator(&ws, pbuilder(), &runner, &context);
    assert_eq!(pipeline.run().await.unwrap(), 3);

    let changelog = Changelog::parse(&read(&ws.tree().join("debian/changelog"))).unwrap();
    let versions: Vec<&str> = changelog.blocks().iter().map(|b| b.version()).collect();
    assert_eq!(versions, ["1.0+abc123-1", "1.0-1"]);

    let dsc = ws.build_dir().join("hello_1.0+abc123-1.dsc");
    assert_eq!(pipeline.preparer().source_package_path(), Some(dsc.as_path()));

    let calls = runner.calls();
    assert_eq!(runner.programs(), ["dpkg-buildpackage", "pbuilder"]);
    assert_eq!(
        calls[1].get_args(),
        [
            "--build".to_string(),
            "--basetgz".to_string(),
            "/var/cache/pbuilder/base.tgz".to_string(),
            "--buildresult".to_string(),
            "/srv/results".to_string(),
            dsc.display().to_string(),
        ]
    );

    let events = drain(&mut rx);
    assert_eq!(
        phases(&events),
        [
            (BuildPhase::Prepare, "started", None),
            (BuildPhase::Prepare, "completed", Some(0)),
            (BuildPhase::Build, "started", None),
            (BuildPhase::Build, "completed", Some(3)),
        ]
    );
    assert!(events.iter().any(|event| matches!(
        event,
        AppEvent::Build(BuildEvent::SourcePackageReady { path, .. }) if *path == dsc
    )));
}

#[tokio::test]
async fn failed_preparation_skips_backend() {
    let ws = Workspace::new(Compression::Gzip).await;
    let runner = Arc::new(RecordingRunner::default().with_code("dpkg-buildpackage", 29));
    let (tx, mut rx) = debforge_events::channel();
    let context = BuildContext::new("hello").with_event_sender(tx);

    let mut pipeline = orchestrator(&ws, pbuilder(), &runner, &context);
    assert_eq!(pipeline.run().await.unwrap(), 29);
    assert_eq!(runner.programs(), ["dpkg-buildpackage"]);

    let events = drain(&mut rx);
    assert_eq!(
        phases(&events),
        [
            (BuildPhase::Prepare, "started", None),
            (BuildPhase::Prepare, "completed", Some(29)),
        ]
    );
}

#[tokio::test]
async fn preparation_error_is_returned_and_backend_skipped() {
    let ws = Workspace::new(Compression::Gzip).await.with_tarball_name("hello-1.0.tar.xz");
    let runner = Arc::new(RecordingRunner::default());
    let (tx, mut rx) = debforge_events::channel();
    let context = BuildContext::new("hello").with_event_sender(tx);

    let mut pipeline = orchestrator(&ws, pbuilder(), &runner, &context);
    let err = pipeline.run().await.unwrap_err();
    assert!(matches!(
        err,
        Error::Build(BuildError::UnsupportedArchiveFormat { .. })
    ));
    assert!(runner.calls().is_empty());
    assert_eq!(
        phases(&drain(&mut rx)),
        [
            (BuildPhase::Prepare, "started", None),
            (BuildPhase::Prepare, "failed", None),
        ]
    );
}

#[tokio::test]
async fn unconfigured_backend_fails_after_preparation() {
    let ws = Workspace::new(Compression::Gzip).await;
    let runner = Arc::new(RecordingRunner::default());
    let context = BuildContext::new("hello");

    let mut pipeline = orchestrator(
        &ws,
        BackendConfig::new("local", BackendKind::Plain),
        &runner,
        &context,
    );
    let err = pipeline.run().await.unwrap_err();
    assert!(matches!(
        err,
        Error::Build(BuildError::NotConfigured { .. })
    ));
    assert_eq!(runner.programs(), ["dpkg-buildpackage"]);
}

#[tokio::test]
async fn every_backend_kind_uses_the_same_pipeline() {
    let cases = [
        (
            BackendConfig::new("local", BackendKind::Plain).with_binary(["debuild"]),
            vec!["debuild"],
        ),
        (pbuilder(), vec!["pbuilder", "--build", "--basetgz"]),
        (
            BackendConfig::new("cowbuilder", BackendKind::Cowbuilder)
                .with_buildbase("/var/cache/pbuilder/base.cow")
                .with_output_dir("/srv/results"),
            vec!["cowbuilder", "--build", "--basepath"],
        ),
    ];

    for (config, prefix) in cases {
        let ws = Workspace::new(Compression::Bzip2).await;
        let runner = Arc::new(RecordingRunner::default());
        let context = BuildContext::new("hello");

        let mut pipeline = orchestrator(&ws, config, &runner, &context);
        assert_eq!(pipeline.run().await.unwrap(), 0);

        let calls = runner.calls();
        let backend = &calls[1];
        let mut argv = vec![backend.program().to_string()];
        argv.extend(backend.get_args().iter().cloned());

        assert!(argv.starts_with(
            &prefix.iter().map(|s| (*s).to_string()).collect::<Vec<_>>()
        ));
        assert_eq!(
            argv.last().map(String::as_str),
            Some(
                ws.build_dir()
                    .join("hello_1.0+abc123-1.dsc")
                    .to_str()
                    .unwrap()
            )
        );
    }
}
