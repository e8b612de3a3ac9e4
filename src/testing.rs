// ============================================================================
// TEST DOUBLES - DOM, cámara, reloj virtual y executor local
// ============================================================================

use futures::channel::oneshot;
use futures::executor::{LocalPool, LocalSpawner};
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::config::ScannerConfig;
use crate::dom::{ScannerSurface, SurfaceResolver};
use crate::error::ScanError;
use crate::models::{CaptureConstraints, Frame};
use crate::services::{Camera, Decoder, MediaStream};
use crate::utils::{Clock, Runtime, Spawner};
use crate::viewmodels::{Scanner, RETRY_DELAY};

// ---------------------------------------------------------------------------
// Stream / cámara
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct MockStream {
    tracks: Rc<Vec<Cell<bool>>>,
}

impl MockStream {
    pub fn with_tracks(count: usize) -> Self {
        Self {
            tracks: Rc::new((0..count).map(|_| Cell::new(true)).collect()),
        }
    }

    pub fn live_tracks(&self) -> usize {
        self.tracks.iter().filter(|track| track.get()).count()
    }
}

impl MediaStream for MockStream {
    fn stop_tracks(&self) {
        for track in self.tracks.iter() {
            track.set(false);
        }
    }
}

type StreamSender = oneshot::Sender<Result<MockStream, ScanError>>;

#[derive(Default)]
struct CameraState {
    pending: RefCell<Option<StreamSender>>,
    requests: Cell<usize>,
    last_constraints: RefCell<Option<CaptureConstraints>>,
}

/// Cámara cuya respuesta decide el test (grant / deny)
#[derive(Clone, Default)]
pub struct MockCamera {
    state: Rc<CameraState>,
}

impl MockCamera {
    pub fn requests(&self) -> usize {
        self.state.requests.get()
    }

    pub fn last_constraints(&self) -> Option<CaptureConstraints> {
        self.state.last_constraints.borrow().clone()
    }

    pub fn grant(&self, stream: MockStream) {
        self.respond(Ok(stream));
    }

    pub fn deny(&self, error: ScanError) {
        self.respond(Err(error));
    }

    fn respond(&self, response: Result<MockStream, ScanError>) {
        let sender = self
            .state
            .pending
            .borrow_mut()
            .take()
            .expect("no pending camera request");
        let _ = sender.send(response);
    }
}

impl Camera for MockCamera {
    type Stream = MockStream;

    fn request_stream(
        &self,
        constraints: &CaptureConstraints,
    ) -> LocalBoxFuture<'static, Result<MockStream, ScanError>> {
        let (sender, receiver) = oneshot::channel();
        *self.state.pending.borrow_mut() = Some(sender);
        *self.state.last_constraints.borrow_mut() = Some(constraints.clone());
        self.state.requests.set(self.state.requests.get() + 1);

        Box::pin(async move {
            receiver
                .await
                .unwrap_or_else(|_| Err(ScanError::camera_access("request dropped")))
        })
    }
}

// ---------------------------------------------------------------------------
// DOM
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct SurfaceLog {
    pub visible: Cell<bool>,
    pub pane_shown: Cell<bool>,
    pub bound: Cell<usize>,
    pub playing: Cell<bool>,
    pub cleared: Cell<usize>,
    pub frames: Cell<usize>,
    pub fail_capture: Cell<bool>,
    /// Devolver frames con menos bytes de los que indican sus dimensiones
    pub short_frame: Cell<bool>,
    pub fail_play: Cell<bool>,
    /// Número total de manipulaciones del DOM
    pub touched: Cell<usize>,
}

#[derive(Clone, Default)]
pub struct MockSurface {
    pub log: Rc<SurfaceLog>,
}

impl MockSurface {
    fn touch(&self) {
        self.log.touched.set(self.log.touched.get() + 1);
    }
}

impl ScannerSurface for MockSurface {
    type Stream = MockStream;

    fn show_container(&self) {
        self.touch();
        self.log.visible.set(true);
    }

    fn hide_container(&self) {
        self.touch();
        self.log.visible.set(false);
    }

    fn show_capture_pane(&self) {
        self.touch();
        self.log.pane_shown.set(true);
    }

    fn bind_stream(&self, _stream: &MockStream) {
        self.touch();
        self.log.bound.set(self.log.bound.get() + 1);
    }

    fn metadata_ready(&self) -> LocalBoxFuture<'static, Result<(), ScanError>> {
        Box::pin(async { Ok(()) })
    }

    fn play(&self) -> Result<(), ScanError> {
        self.touch();
        if self.log.fail_play.get() {
            return Err(ScanError::camera_access("NotAllowedError: play() requires a gesture"));
        }
        self.log.playing.set(true);
        Ok(())
    }

    fn pause(&self) {
        self.touch();
        self.log.playing.set(false);
    }

    fn clear_source(&self) {
        self.touch();
        self.log.cleared.set(self.log.cleared.get() + 1);
    }

    fn capture_frame(&self) -> Result<Frame, ScanError> {
        self.touch();
        self.log.frames.set(self.log.frames.get() + 1);
        if self.log.fail_capture.get() {
            return Err(ScanError::capture("IndexSizeError: canvas has zero size"));
        }
        if self.log.short_frame.get() {
            return Ok(Frame::new(vec![0; 10], 4, 3));
        }
        Ok(Frame::blank(4, 3))
    }
}

pub struct MockDocument {
    surface: Option<MockSurface>,
}

impl MockDocument {
    pub fn with(surface: MockSurface) -> Self {
        Self {
            surface: Some(surface),
        }
    }

    pub fn missing() -> Self {
        Self { surface: None }
    }
}

impl SurfaceResolver for MockDocument {
    type Surface = MockSurface;

    fn resolve(&self, locator: &str) -> Result<MockSurface, ScanError> {
        self.surface.clone().ok_or_else(|| {
            ScanError::configuration(format!("{}: QRCodeScanner's root element not found", locator))
        })
    }
}

// ---------------------------------------------------------------------------
// Reloj virtual / executor
// ---------------------------------------------------------------------------

#[derive(Default)]
struct ClockState {
    now: Cell<Duration>,
    timers: RefCell<Vec<(Duration, oneshot::Sender<()>)>>,
}

/// Reloj que solo avanza con `advance`
#[derive(Clone, Default)]
pub struct VirtualClock {
    state: Rc<ClockState>,
}

impl VirtualClock {
    pub fn now(&self) -> Duration {
        self.state.now.get()
    }

    pub fn pending_timers(&self) -> usize {
        self.state.timers.borrow().len()
    }

    /// Avanzar el tiempo y despertar los timers vencidos
    pub fn advance(&self, by: Duration) {
        let now = self.now() + by;
        self.state.now.set(now);

        let due = {
            let mut timers = self.state.timers.borrow_mut();
            let (due, pending): (Vec<_>, Vec<_>) =
                timers.drain(..).partition(|(deadline, _)| *deadline <= now);
            *timers = pending;
            due
        };
        for (_, sender) in due {
            let _ = sender.send(());
        }
    }

    /// Runtime para tests que nunca llegan a lanzar tareas
    pub fn runtime_without_executor(&self) -> Runtime {
        Runtime::new(Rc::new(self.clone()), Rc::new(NoSpawner))
    }
}

impl Clock for VirtualClock {
    fn sleep(&self, delay: Duration) -> LocalBoxFuture<'static, ()> {
        let (sender, receiver) = oneshot::channel();
        self.state.timers.borrow_mut().push((self.now() + delay, sender));
        Box::pin(async move {
            let _ = receiver.await;
        })
    }
}

pub struct PoolSpawner(LocalSpawner);

impl Spawner for PoolSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        self.0.spawn_local(task).expect("local pool shut down");
    }
}

struct NoSpawner;

impl Spawner for NoSpawner {
    fn spawn(&self, _task: LocalBoxFuture<'static, ()>) {
        panic!("no executor in this test");
    }
}

// ---------------------------------------------------------------------------
// Decoders
// ---------------------------------------------------------------------------

/// Nunca encuentra un código
pub struct NeverDecoder;

impl Decoder for NeverDecoder {
    type Output = String;

    fn decode(&self, _pixels: &[u8], _width: u32, _height: u32) -> Option<String> {
        None
    }
}

/// Lo que los decoders de test comparten con el harness
pub struct DecodeTrace {
    pub clock: VirtualClock,
    pub calls: Rc<RefCell<Vec<Duration>>>,
}

/// Falla `misses` veces y luego devuelve "payload"; anota el instante de cada llamada
pub struct CountingDecoder {
    clock: VirtualClock,
    calls: Rc<RefCell<Vec<Duration>>>,
    misses: usize,
}

impl CountingDecoder {
    pub fn new(trace: &DecodeTrace, misses: usize) -> Self {
        Self {
            clock: trace.clock.clone(),
            calls: trace.calls.clone(),
            misses,
        }
    }
}

impl Decoder for CountingDecoder {
    type Output = String;

    fn decode(&self, pixels: &[u8], width: u32, height: u32) -> Option<String> {
        assert_eq!(pixels.len(), (width * height * 4) as usize);
        let mut calls = self.calls.borrow_mut();
        calls.push(self.clock.now());
        (calls.len() > self.misses).then(|| "payload".to_string())
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct Harness<D: Decoder + 'static> {
    pub pool: LocalPool,
    pub scanner: Scanner<MockSurface, MockCamera, D>,
    pub surface: MockSurface,
    pub camera: MockCamera,
    pub clock: VirtualClock,
    pub decoder_calls: Rc<RefCell<Vec<Duration>>>,
}

impl<D: Decoder + 'static> Harness<D> {
    pub fn new(make_decoder: impl FnOnce(&DecodeTrace) -> D) -> Self {
        let pool = LocalPool::new();
        let clock = VirtualClock::default();
        let surface = MockSurface::default();
        let camera = MockCamera::default();
        let trace = DecodeTrace {
            clock: clock.clone(),
            calls: Rc::new(RefCell::new(Vec::new())),
        };

        let runtime = Runtime::new(
            Rc::new(clock.clone()),
            Rc::new(PoolSpawner(pool.spawner())),
        );
        let scanner = Scanner::new(
            ScannerConfig {
                debug: true,
                ..Default::default()
            },
            &MockDocument::with(surface.clone()),
            camera.clone(),
            make_decoder(&trace),
            runtime,
        )
        .expect("mock document resolves");

        Self {
            pool,
            scanner,
            surface,
            camera,
            clock,
            decoder_calls: trace.calls,
        }
    }

    /// Ejecutar todas las tareas listas
    pub fn run(&mut self) {
        self.pool.run_until_stalled();
    }

    /// Avanzar un intervalo de reintento
    pub fn tick(&mut self) {
        self.clock.advance(RETRY_DELAY);
        self.run();
    }
}

/// Callback que guarda cada resultado recibido
pub fn recorder<T: 'static>() -> (
    Rc<RefCell<Vec<Result<T, ScanError>>>>,
    impl FnOnce(Result<T, ScanError>) + 'static,
) {
    let outcomes = Rc::new(RefCell::new(Vec::new()));
    let sink = outcomes.clone();
    (outcomes, move |outcome: Result<T, ScanError>| {
        sink.borrow_mut().push(outcome)
    })
}
