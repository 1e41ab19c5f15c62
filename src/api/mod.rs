//! High-level, ergonomic library API: resolve render arguments against the
//! configured cloud state, and open a job composer wired to a render queue.
//! Prefer these entrypoints over assembling `core::resolve` and `composer` by hand.
use std::sync::Arc;

use tracing::debug;

use crate::composer::{ComposerDeps, ComposerHost, DraftSeed, JobComposer};
use crate::config::CloudConfig;
use crate::core::resolve::{ArgumentResolver, Collaborators, RenderInput, ResolvedRenderArgs};
use crate::error::Result;
use crate::io::{CompositionDirectory, CompositionPicker, FileExistence, LocalCloud};
use crate::queue::RenderQueue;

/// Resolve `input` for `subcommand` with explicit collaborators.
pub fn resolve_with(
    region: &str,
    collaborators: Collaborators<'_>,
    subcommand: &str,
    input: &RenderInput,
) -> Result<ResolvedRenderArgs> {
    ArgumentResolver::new(region, collaborators).resolve(subcommand, input)
}

/// Resolve `input` against the file-backed cloud state named by `config`.
///
/// The picker is only consulted when no composition id was passed.
pub fn resolve_render_args(
    config: &CloudConfig,
    subcommand: &str,
    input: &RenderInput,
    picker: &dyn CompositionPicker,
) -> Result<ResolvedRenderArgs> {
    let cloud = LocalCloud::open(&config.state_file);
    debug!(
        "Resolving {} arguments in {} using {:?}",
        subcommand,
        config.region,
        cloud.path()
    );
    let collaborators = Collaborators {
        buckets: &cloud,
        services: &cloud,
        compositions: &cloud,
        picker,
    };
    resolve_with(&config.region, collaborators, subcommand, input)
}

/// Open a composer whose submissions land in `queue`.
pub fn open_composer(
    seed: DraftSeed,
    queue: &RenderQueue,
    compositions: Arc<dyn CompositionDirectory>,
    files: Arc<dyn FileExistence>,
    host: Box<dyn ComposerHost>,
) -> Result<JobComposer> {
    let deps = ComposerDeps {
        client: Arc::new(queue.clone()),
        compositions,
        files,
    };
    JobComposer::open(seed, deps, host)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::composer::SubmissionState;
    use crate::core::params::Composition;
    use crate::io::FsFileExistence;
    use crate::queue::JobStatus;
    use crate::types::RenderMode;

    struct Host {
        closed: Rc<Cell<bool>>,
    }

    impl ComposerHost for Host {
        fn close_composer(&self) {
            self.closed.set(true);
        }
    }

    #[test]
    fn composer_submits_into_queue() {
        let dir = tempfile::tempdir().unwrap();
        let queue = RenderQueue::new();
        let closed = Rc::new(Cell::new(false));
        let compositions: Arc<dyn CompositionDirectory> =
            Arc::new(vec![Composition::new("intro", 90)]);

        let mut composer = open_composer(
            DraftSeed::for_composition("intro", RenderMode::Video),
            &queue,
            compositions,
            Arc::new(FsFileExistence::new(dir.path())),
            Box::new(Host {
                closed: Rc::clone(&closed),
            }),
        )
        .unwrap();

        assert!(composer.submit());
        assert_eq!(composer.wait(), Some(SubmissionState::Success));
        assert!(closed.get());

        let jobs = queue.jobs();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].status, JobStatus::Queued);
        assert_eq!(jobs[0].kind(), RenderMode::Video);
        assert_eq!(jobs[0].request.out_name(), "out/intro.mp4");
    }
}
