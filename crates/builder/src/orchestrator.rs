//! Two-phase pipeline: source package, then binary build

use debforge_errors::Error;
use debforge_events::{BuildPhase, EventEmitter};
use std::time::Instant;

use crate::backend::BuilderBackend;
use crate::context::BuildContext;
use crate::source::SourcePackagePreparer;

/// Runs preparation and hands the descriptor to the backend
pub struct BuildOrchestrator {
    preparer: SourcePackagePreparer,
    backend: Box<dyn BuilderBackend>,
    context: BuildContext,
}

impl BuildOrchestrator {
    #[must_use]
    pub fn new(
        preparer: SourcePackagePreparer,
        backend: Box<dyn BuilderBackend>,
        context: BuildContext,
    ) -> Self {
        Self {
            preparer,
            backend,
            context,
        }
    }

    #[must_use]
    pub fn preparer(&self) -> &SourcePackagePreparer {
        &self.preparer
    }

    /// Run both phases
    ///
    /// A non-zero preparation exit code is returned as is and the backend is
    /// never started. Otherwise the backend's exit code is returned.
    ///
    /// # Errors
    ///
    /// Returns the first error of either phase.
    pub async fn run(&mut self) -> Result<i32, Error> {
        let prepare = self.phase(BuildPhase::Prepare);
        let code = prepare.finish(&self.context, self.preparer.prepare().await)?;
        if code != 0 {
            return Ok(code);
        }

        let build = self.phase(BuildPhase::Build);
        let result = self
            .backend
            .build(self.preparer.source_package_path())
            .await;
        build.finish(&self.context, result)
    }

    fn phase(&self, phase: BuildPhase) -> PhaseTimer {
        self.context
            .emit_phase_started(&self.context.session_id, &self.context.package, phase);
        PhaseTimer {
            phase,
            start: Instant::now(),
        }
    }
}

struct PhaseTimer {
    phase: BuildPhase,
    start: Instant,
}

impl PhaseTimer {
    fn finish(self, context: &BuildContext, result: Result<i32, Error>) -> Result<i32, Error> {
        match &result {
            Ok(code) => context.emit_phase_completed(
                &context.session_id,
                &context.package,
                self.phase,
                *code,
                self.start.elapsed(),
            ),
            Err(e) => context.emit_phase_failed(
                &context.session_id,
                &context.package,
                self.phase,
                e.to_string(),
            ),
        }
        result
    }
}
