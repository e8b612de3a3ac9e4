// ============================================================================
// TIMERS Y TAREAS - Reloj y spawner inyectables
// ============================================================================
// En el navegador: gloo_timers + wasm_bindgen_futures::spawn_local
// En tests: reloj virtual + LocalPool (ver crate::testing)
// ============================================================================

use futures::future::LocalBoxFuture;
use std::rc::Rc;
use std::time::Duration;

/// Fuente de esperas (setTimeout en el navegador)
pub trait Clock {
    fn sleep(&self, delay: Duration) -> LocalBoxFuture<'static, ()>;
}

/// Ejecuta tareas async en el hilo actual
pub trait Spawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}

pub struct BrowserClock;

impl Clock for BrowserClock {
    fn sleep(&self, delay: Duration) -> LocalBoxFuture<'static, ()> {
        Box::pin(gloo_timers::future::sleep(delay))
    }
}

pub struct BrowserSpawner;

impl Spawner for BrowserSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

/// Reloj + spawner que usa el scanner
#[derive(Clone)]
pub struct Runtime {
    pub clock: Rc<dyn Clock>,
    pub spawner: Rc<dyn Spawner>,
}

impl Runtime {
    pub fn new(clock: Rc<dyn Clock>, spawner: Rc<dyn Spawner>) -> Self {
        Self { clock, spawner }
    }

    pub fn browser() -> Self {
        Self::new(Rc::new(BrowserClock), Rc::new(BrowserSpawner))
    }
}
