//! The `replay` command: run a step script through an event loop wired to
//! the console collaborators.

use std::sync::Arc;

use tabspeed_engine::{
    FileStore, KeyEvent, Services, TokioTicks,
    deps::ConfigStore,
    driver::{self, Event, EventLoop},
};
use tokio::sync::oneshot;
use tracing::info;

use crate::{
    cli::ReplayArgs,
    console::{ConsoleBrowser, ConsoleSink, MemoryStore, Page, PageTrackers, ScriptFeeds},
    error::{Error, Result},
    script::{self, Step},
};

/// Execute the script named in `args`.
pub async fn run(args: &ReplayArgs) -> Result<()> {
    let steps = script::load(&args.script)?;
    let page = Arc::new(Page::default());
    let store: Arc<dyn ConfigStore> = match &args.config {
        Some(path) => Arc::new(FileStore::new(path)),
        None => Arc::new(MemoryStore::default()),
    };
    let services = Services {
        sink: Arc::new(ConsoleSink),
        trackers: Arc::new(PageTrackers::new(page.clone())),
        browser: Arc::new(ConsoleBrowser::new(args.tab)),
        store,
        ticks: Arc::new(TokioTicks),
        host: Arc::new(ScriptFeeds),
    };

    let (mut event_loop, tx) = EventLoop::start(services).await?;
    info!(steps = steps.len(), tab = args.tab, "replay started");
    for step in steps {
        match step {
            Step::Key { chord, target } => {
                let (reply, verdict) = oneshot::channel();
                event_loop.handle(Event::KeyDown {
                    event: KeyEvent::from_chord(&chord).at(target),
                    reply: Some(reply),
                });
                let verdict = verdict.await.map_err(|_| Error::LoopStopped)?;
                println!("[key] {} -> {:?}", chord, verdict);
            }
            Step::AddMedia { id, time } => page.add_media(id, time),
            Step::RemoveMedia { id } => page.remove_media(id),
            Step::AddFx { id } => page.add_fx(id),
            Step::Tick => {
                event_loop.handle(Event::Tick);
            }
            Step::LoadConfig { path } => {
                let next = config::load_from_path(&path)?;
                event_loop.handle(Event::ConfigChanged(Some(next)));
            }
            Step::EmptyChange => {
                event_loop.handle(Event::ConfigChanged(None));
            }
            Step::State => {
                let ctx = event_loop.manager().context();
                println!("[state] {}", serde_json::to_string(&ctx)?);
            }
        }
    }

    driver::post(&tx, Event::Shutdown)?;
    let manager = event_loop.run().await;
    info!(released = manager.is_released(), "replay finished");
    Ok(())
}
