//! Client core for the Tally task service: wire types, the auth and task
//! clients, the session seam and the in-memory board the views render from.

pub mod auth;
pub mod board;
pub mod error;
pub mod model;
pub mod navigation;
pub mod session;
pub mod tasks;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod transport;

pub use auth::AuthClient;
pub use board::{
  BoardAction,
  TaskBoard,
  TaskOutcome,
  actions_for,
  visible_tasks
};
pub use error::{
  ApiError,
  ApiResult
};
pub use model::{
  PriorityFilter,
  Selector,
  StatusFilter,
  TaskDto,
  TaskPriority,
  TaskStatus
};
pub use navigation::{
  Screen,
  after_success,
  resolve_screen
};
pub use session::{
  MemorySessionStore,
  SessionStore,
  sign_in,
  sign_out
};
pub use tasks::TaskClient;
pub use transport::{
  ApiMethod,
  ApiRequest,
  ApiResponse,
  Transport
};

/// Service the clients talk to unless configured otherwise.
pub const DEFAULT_API_BASE: &str =
  "https://todobackendd-ou32.onrender.com";
