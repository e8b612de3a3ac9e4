// State Management con Rc<RefCell> / Rc<Cell>

pub mod session_state;

pub use session_state::*;
