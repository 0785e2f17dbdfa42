use std::{
    ops::Deref as _,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    thread::{self, JoinHandle},
};

use anyhow::{Context as _, anyhow};
use image::{GenericImage, GenericImageView, RgbaImage};

use crate::{
    geometry::ScreenBlock,
    renderer::{RenderJob, worker::Worker},
    scene::Intersectable,
};

/// Number of finished tiles out of all tiles of the render.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TileProgress {
    pub finished: usize,
    pub total: usize,
}

/// Starts rendering the job on one worker thread per CPU core and returns immediately.
pub fn render<
    O: Intersectable + Send + Sync + 'static,
    F1: Fn(ScreenBlock) + Send + Sync + 'static,
    F2: Fn(ScreenBlock, TileProgress) + Send + Sync + 'static,
>(
    job: RenderJob<O>,
    started_tile_callback: F1,
    finished_tile_callback: F2,
) -> anyhow::Result<RenderProgress<O>> {
    let resolution = job.camera.resolution();
    let image = RgbaImage::new(resolution.x, resolution.y);
    let tile_ordering = ScreenBlock::from_size(resolution).tile_ordering(job.settings.tile_size);

    tracing::info!(
        width = resolution.x,
        height = resolution.y,
        tiles = tile_ordering.len(),
        samples = job.settings.sample_count.get(),
        "Starting render"
    );

    let tile_size = job.settings.tile_size.get();
    let state = Arc::new(RenderState {
        job,

        image: Mutex::new(image),

        tile_ordering,
        next_tile_index: AtomicUsize::new(0),
        finished_tiles: AtomicUsize::new(0),
    });
    let started_tile_callback = Arc::new(started_tile_callback);
    let finished_tile_callback = Arc::new(finished_tile_callback);

    let cores = core_affinity::get_core_ids()
        .ok_or_else(|| anyhow!("Failed to list CPU cores"))?
        .into_iter()
        .enumerate();

    let threads = cores
        .map(|(worker_id, core)| {
            let state = Arc::clone(&state);
            let started_tile_callback = Arc::clone(&started_tile_callback);
            let finished_tile_callback = Arc::clone(&finished_tile_callback);

            thread::Builder::new()
                .name(format!("worker{worker_id}"))
                .spawn(move || {
                    if !core_affinity::set_for_current(core) {
                        tracing::debug!(worker_id, "Failed to pin worker thread");
                    }

                    let mut worker = Worker::default();
                    let mut buffer = RgbaImage::new(tile_size, tile_size);

                    while let Some(tile) = state.get_next_tile() {
                        (started_tile_callback)(*tile);

                        worker.render_tile(&state.job, tile, &mut buffer);
                        state
                            .image
                            .lock()
                            .unwrap_or_else(|poisoned| poisoned.into_inner())
                            .copy_from(
                                buffer.view(0, 0, tile.width(), tile.height()).deref(),
                                tile.min().x,
                                tile.min().y,
                            )
                            .unwrap_or_else(|_| {
                                unreachable!("The buffer should always fit into the output")
                            });

                        let finished = state.finished_tiles.fetch_add(1, Ordering::AcqRel) + 1;
                        (finished_tile_callback)(
                            *tile,
                            TileProgress {
                                finished,
                                total: state.tile_ordering.len(),
                            },
                        );
                    }
                })
        })
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to spawn worker threads")?;

    Ok(RenderProgress {
        render_state: state,
        threads,
    })
}

pub struct RenderProgress<O: Intersectable> {
    render_state: Arc<RenderState<O>>,
    threads: Vec<JoinHandle<()>>,
}

impl<O: Intersectable> RenderProgress<O> {
    pub fn progress(&self) -> TileProgress {
        TileProgress {
            finished: self.render_state.finished_tiles.load(Ordering::Acquire),
            total: self.render_state.tile_ordering.len(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.threads.iter().all(|handle| handle.is_finished())
    }

    /// Signal the workers to abort.
    /// Any running workers will still finish their tiles, but no new ones will be started.
    pub fn abort(&self) {
        self.render_state
            .next_tile_index
            .store(self.render_state.tile_ordering.len(), Ordering::Release);
    }

    /// Blocks until all workers are done.
    pub fn wait(&mut self) -> anyhow::Result<()> {
        for handle in self.threads.drain(..) {
            handle
                .join()
                .map_err(|_| anyhow!("Render worker thread panicked"))?;
        }

        let progress = self.progress();
        tracing::info!(
            finished = progress.finished,
            total = progress.total,
            "Render done"
        );
        Ok(())
    }

    pub fn image(&self) -> &Mutex<RgbaImage> {
        &self.render_state.image
    }
}

struct RenderState<O: Intersectable> {
    job: RenderJob<O>,

    image: Mutex<RgbaImage>,

    tile_ordering: Vec<ScreenBlock>,
    next_tile_index: AtomicUsize,
    finished_tiles: AtomicUsize,
}

impl<O: Intersectable> RenderState<O> {
    fn get_next_tile(&self) -> Option<&ScreenBlock> {
        let id = self.next_tile_index.fetch_add(1, Ordering::AcqRel);
        self.tile_ordering.get(id)
    }
}
