use raymarch_input::{CameraState, EventQueue, InputConfig, InputEvent, InputState};
use raymarch_render::{
    DrawOutcome, FrameStats, FrameTarget, INPUT_CAMERA_POS, INPUT_PITCH, INPUT_RESOLUTION,
    INPUT_TIME, INPUT_YAW, RenderError, ShaderVariant, UniformError,
};
use raymarch_timing::{
    DEFAULT_WINDOW_CAPACITY, FrameTimer, FrameTimingWindow, TimeSource, TimingError,
};

/// Runtime knobs for the render loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerConfig {
    pub input: InputConfig,
    pub variant: ShaderVariant,
    /// Number of recent frames averaged for the smoothed rate.
    pub timing_capacity: usize,
    /// Upper bound on the per-frame delta time fed to camera movement.
    pub max_delta_time: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            variant: ShaderVariant::default(),
            timing_capacity: DEFAULT_WINDOW_CAPACITY,
            max_delta_time: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ViewerError {
    #[error("frame timing failed")]
    Timing(#[from] TimingError),
    #[error("failed to set shader input")]
    Uniform(#[from] UniformError),
    #[error("render target failed")]
    Render(#[from] RenderError),
}

/// What one loop iteration did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub frame_index: u64,
    /// Seconds of camera movement integrated this frame, after clamping.
    pub delta_time: f64,
    /// `None` when the target skipped the frame.
    pub stats: Option<FrameStats>,
}

impl FrameReport {
    pub fn skipped(&self) -> bool {
        self.stats.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Continue(FrameReport),
    /// Close was requested; the target has been released.
    Exit,
}

/// Owns all per-session state: camera, drag, held keys, timing.
///
/// The window layer pushes events and calls [`Viewer::step`] once per
/// redraw. Nothing else mutates the state.
#[derive(Debug)]
pub struct Viewer<T: TimeSource + Clone> {
    config: ViewerConfig,
    input: InputState,
    queue: EventQueue,
    timer: FrameTimer<T>,
    clock: T,
    start: f64,
    last_frame: Option<f64>,
    frame_index: u64,
    close_requested: bool,
    released: bool,
}

impl<T: TimeSource + Clone> Viewer<T> {
    pub fn new(config: ViewerConfig, clock: T) -> Result<Self, ViewerError> {
        let start = read(&clock)?;
        tracing::info!(
            variant = %config.variant,
            timing_window = config.timing_capacity,
            "viewer initialized"
        );
        Ok(Self {
            input: InputState::new(config.input),
            queue: EventQueue::new(),
            timer: FrameTimer::new(clock.clone(), config.timing_capacity),
            clock,
            start,
            last_frame: None,
            frame_index: 0,
            close_requested: false,
            released: false,
            config,
        })
    }

    pub fn camera(&self) -> &CameraState {
        self.input.camera()
    }

    pub fn timing_window(&self) -> &FrameTimingWindow {
        self.timer.window()
    }

    /// Queues an event for the next step. Safe to call from any callback.
    pub fn push_event(&mut self, event: InputEvent) {
        self.queue.push(event);
    }

    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    /// Runs one frame against `target`, or releases it if close was
    /// requested.
    pub fn step<F>(&mut self, target: &mut F) -> Result<Step, ViewerError>
    where
        F: FrameTarget + ?Sized,
    {
        if self.close_requested {
            if !self.released {
                target.release();
                self.released = true;
                tracing::info!(frames = self.frame_index, "render loop finished");
            }
            return Ok(Step::Exit);
        }

        let result = self.frame(target);
        if result.is_err() {
            self.timer.abandon_frame();
        }
        result.map(Step::Continue)
    }

    fn frame<F>(&mut self, target: &mut F) -> Result<FrameReport, ViewerError>
    where
        F: FrameTarget + ?Sized,
    {
        let frame_index = self.frame_index;
        self.frame_index += 1;

        // Outside the timed span: this is where vsync waits.
        if target.acquire_frame()? == DrawOutcome::Skipped {
            tracing::warn!(frame = frame_index, "frame skipped");
            return Ok(FrameReport {
                frame_index,
                delta_time: 0.0,
                stats: None,
            });
        }

        self.timer.begin_frame()?;

        for event in self.queue.drain() {
            self.input.apply(event);
        }

        let now = read(&self.clock)?;
        let delta_time = match self.last_frame {
            Some(last) if now < last => {
                return Err(TimingError::NegativeElapsed(now - last).into());
            }
            Some(last) => (now - last).min(self.config.max_delta_time),
            None => 0.0,
        };
        self.last_frame = Some(now);
        self.input.integrate(delta_time as f32);

        let resolution = target.framebuffer_size().as_vec2();
        let elapsed = (now - self.start) as f32;
        let camera = *self.input.camera();
        let variant = self.config.variant;

        let inputs = target.bind_program()?;
        inputs.set_vec2(INPUT_RESOLUTION, resolution)?;
        inputs.set_f32(INPUT_TIME, elapsed)?;
        if variant.uses_angles() {
            inputs.set_f32(INPUT_YAW, camera.yaw())?;
            inputs.set_f32(INPUT_PITCH, camera.pitch())?;
        }
        if variant.uses_position() {
            inputs.set_vec3(INPUT_CAMERA_POS, camera.position)?;
        }

        target.draw_fullscreen_quad()?;
        let sample = self.timer.end_frame()?;
        let stats = FrameStats {
            render_time: sample.elapsed,
            smoothed_rate: sample.smoothed_rate,
            frame_index,
        };
        target.present(&stats)?;

        tracing::trace!(
            frame = frame_index,
            dt = delta_time,
            render_ms = stats.render_time_ms(),
            fps = stats.smoothed_rate,
            "frame"
        );
        Ok(FrameReport {
            frame_index,
            delta_time,
            stats: Some(stats),
        })
    }
}

fn read<T: TimeSource>(clock: &T) -> Result<f64, TimingError> {
    let now = clock.now();
    if now.is_finite() {
        Ok(now)
    } else {
        Err(TimingError::NonFinite(now))
    }
}
