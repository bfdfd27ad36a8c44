use crate::decode::source::FrameSource;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{MoshError, MoshResult};
use crate::mosh::base::BaseFrameStore;
use crate::mosh::composite::apply_updates_in;
use crate::mosh::observer::MoshObserver;
use crate::mosh::select::{SelectParams, select_updates_in};
use crate::session::config::{MoshConfig, MoshSessionOpts};

/// Counters for one [`MoshSession::run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoshStats {
    /// Frames pulled from the source, including the seeding first frame.
    pub frames_decoded: u64,
    /// Frames handed to the sink.
    pub frames_emitted: u64,
    /// Base frame resets triggered by the refresh rate.
    pub resets: u64,
    /// Total `division_size` blocks copied onto the base frame.
    pub blocks_updated: u64,
}

/// Validated mosh configuration plus the worker pool used to run it.
///
/// A session can run any number of sources; every run starts from fresh base/previous frames.
pub struct MoshSession {
    config: MoshConfig,
    params: SelectParams,
    pool: Option<rayon::ThreadPool>,
}

impl MoshSession {
    /// Validate `config` and build the session. Fails before any frame is read.
    pub fn new(config: MoshConfig, opts: MoshSessionOpts) -> MoshResult<Self> {
        config.validate()?;
        let pool = if opts.parallel {
            Some(build_thread_pool(opts.threads)?)
        } else {
            None
        };
        Ok(Self {
            params: config.select_params(),
            config,
            pool,
        })
    }

    /// The validated configuration.
    pub fn config(&self) -> &MoshConfig {
        &self.config
    }

    /// Mosh every frame of `source` into `sink`.
    ///
    /// The first decoded frame seeds the previous frame and the base frame and is not emitted.
    /// Every later frame runs reset, selection and compositing, then the base frame is pushed to the
    /// sink. Any error aborts the run; `sink.end()` is only called after the source is exhausted.
    #[tracing::instrument(skip_all, fields(division_size = self.config.division_size, fractal_level = self.config.fractal_level, budget = self.config.budget))]
    pub fn run(
        &self,
        source: &mut dyn FrameSource,
        sink: &mut dyn FrameSink,
        observer: &mut dyn MoshObserver,
    ) -> MoshResult<MoshStats> {
        let info = source.info();
        let Some(mut prev) = source.next_frame()? else {
            return Err(MoshError::empty_source("cannot read the first frame"));
        };
        if prev.width != info.width || prev.height != info.height {
            return Err(MoshError::frame_geometry(format!(
                "first frame is {}x{}, source reports {}x{}",
                prev.width, prev.height, info.width, info.height
            )));
        }

        let mut base = BaseFrameStore::init(&prev, self.config.start_blank)?;
        sink.begin(SinkConfig {
            width: info.width,
            height: info.height,
            fps: info.fps,
        })?;

        let refresh = self.config.refresh_every();
        let pool = self.pool.as_ref();
        let mut stats = MoshStats {
            frames_decoded: 1,
            ..MoshStats::default()
        };

        let mut next_idx = 0u64;
        while let Some(curr) = source.next_frame()? {
            stats.frames_decoded += 1;
            let idx = FrameIndex(next_idx);
            observer.on_frame_start(idx);
            prev.ensure_same_geometry(&curr, "decoded frame differs from previous frame")?;

            if base.reset_if_due(idx, refresh) {
                stats.resets += 1;
                observer.on_reset(idx);
            }

            let updates = select_updates_in(&prev, &curr, &self.params, pool, observer)?;
            apply_updates_in(
                base.frame_mut(),
                &curr,
                &updates,
                self.params.division_size,
                pool,
            )?;

            sink.push_frame(idx, base.frame())?;
            observer.on_frame_emitted(idx, updates.len());
            stats.frames_emitted += 1;
            stats.blocks_updated += updates.len() as u64;

            prev = curr;
            next_idx += 1;
        }

        sink.end()?;
        tracing::info!(
            frames_decoded = stats.frames_decoded,
            frames_emitted = stats.frames_emitted,
            resets = stats.resets,
            "mosh run finished"
        );
        Ok(stats)
    }
}

fn build_thread_pool(threads: Option<usize>) -> MoshResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(MoshError::configuration(
            "threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| MoshError::configuration(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/session/mosh_session.rs"]
mod tests;
