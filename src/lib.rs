#![doc = r#"
rendr: render job composer and Cloud Run render argument resolver.

This crate holds the logic behind two ways of starting a render:

- an interactive **job composer** that keeps a still or video job draft valid on every
  edit (numbers are clamped into range, the output extension follows the codec or image
  format) and submits it to the render engine at most once per user action;
- a **render argument resolver** that turns loose command input (a site name or serve
  URL, an optional composition id, optional service flags) into a fully resolved
  Cloud Run render request, failing fast on the first step that cannot be resolved.

The render engine and the cloud APIs are collaborators reached through the traits in
[`io`]. The `rendr` binary binds the cloud side to a local JSON state file.

Add dependency
--------------
```toml
[dependencies]
rendr = "0.1"
```

Quick start: resolve render arguments
-------------------------------------
```rust,no_run
use rendr::{resolve_render_args, CloudConfig, RenderInput, TerminalPicker};

fn main() -> rendr::Result<()> {
    let config = CloudConfig::default();
    let input = RenderInput {
        positional: vec!["my-site".to_string(), "intro".to_string()],
        ..Default::default()
    };

    let resolved = resolve_render_args(&config, "render", &input, &TerminalPicker::stdio())?;
    println!("{} -> {}", resolved.serve_url, resolved.target_service.cloud_run_url());
    Ok(())
}
```

Compose and submit a job
------------------------
```rust,no_run
use std::sync::Arc;
use rendr::core::clamp::FieldInput;
use rendr::{
    open_composer, Codec, Composition, ComposerHost, DraftSeed, FsFileExistence,
    RenderMode, RenderQueue,
};

struct Host;

impl ComposerHost for Host {
    fn close_composer(&self) {
        println!("job queued");
    }
}

fn main() -> rendr::Result<()> {
    let queue = RenderQueue::new();
    let mut composer = open_composer(
        DraftSeed::for_composition("intro", RenderMode::Video),
        &queue,
        Arc::new(vec![Composition::new("intro", 300)]),
        Arc::new(FsFileExistence::new(".")),
        Box::new(Host),
    )?;

    composer.set_codec(Codec::Vp9); // out/intro.webm
    composer.set_quality(FieldInput::text("95"));
    composer.submit();
    composer.wait();

    for item in queue.items() {
        println!("{} {} {}", item.title, item.output_name, item.status_label);
    }
    Ok(())
}
```

Error handling
--------------
All public functions return `rendr::Result<T>`. Usage errors (`Error::is_usage`) carry
follow-up lines in `Error::remediation` that the CLI prints after the diagnostic.

```rust,no_run
use rendr::{resolve_render_args, CloudConfig, Error, RenderInput, TerminalPicker};

fn main() {
    let input = RenderInput {
        positional: vec!["my-site".to_string(), "intro".to_string()],
        cloud_run_url: Some("https://render.a.run.app".to_string()),
        service_name: Some("render-service".to_string()),
        ..Default::default()
    };
    match resolve_render_args(&CloudConfig::default(), "render", &input, &TerminalPicker::stdio()) {
        Ok(resolved) => println!("{resolved:?}"),
        Err(Error::ConflictingServiceFlags) => eprintln!("pick one of the service flags"),
        Err(other) => eprintln!("{other}"),
    }
}
```

Useful modules
--------------
- [`api`]: high-level, ergonomic entry points.
- [`composer`]: the interactive job composer and its state machine.
- [`core`]: clamping, output naming, job parameters and the argument resolver.
- [`queue`]: in-memory render queue and its row view model.
- [`io`]: collaborator contracts and their local bindings.
- [`error`]: crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod composer;
pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod logging;
pub mod queue;
pub mod types;

// Curated public API surface
// Types
pub use config::CloudConfig;
pub use crate::core::params::{Composition, JobRequest, StillJobParams, VideoJobParams};
pub use crate::core::resolve::{RenderInput, ResolvedRenderArgs, TargetService};
pub use error::{Error, Result};
pub use types::{Codec, ImageFormat, Privacy, RenderMode};

// Composer and queue
pub use composer::{
    ComposerDeps, ComposerHost, DraftLimits, DraftSeed, JobComposer, RenderDraft,
    SubmissionState,
};
pub use queue::{JobStatus, RenderJob, RenderQueue, RenderQueueItem};

// Collaborators
pub use io::{
    CompositionDirectory, CompositionPicker, FileExistence, FsFileExistence, LocalCloud,
    RenderJobClient, TerminalPicker,
};

// High-level API re-exports
pub use api::{open_composer, resolve_render_args, resolve_with};
