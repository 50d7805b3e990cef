//! # System Lifecycle & Orchestration
//!
//! Starting, wiring and stopping the pieces of the greeting: the scene actor,
//! the frame driver that ticks it, the asset loader that installs its pool, and
//! the HTTP server carrying the message proxy.
//!
//! ## Startup Order
//!
//! 1. **Bind** the server address (fails fast on a bad address)
//! 2. **Spawn the scene actor**, uninitialized: camera and stars move, the
//!    pool does not exist yet
//! 3. **Spawn the frame driver** with a scene-client clone
//! 4. **Spawn the asset loader**: environment map, then fonts, then
//!    `build_pool` and `install`
//! 5. **Spawn the server**
//!
//! A failed asset load is logged and leaves the scene uninitialized; the proxy
//! keeps serving.
//!
//! ## Graceful Shutdown
//!
//! One `watch::Sender<bool>` is the stop signal. The driver, the loader and the
//! server all watch it. The scene actor does not: it stops when the last
//! [`SceneClient`](orbit_scene::SceneClient) is dropped, exactly like any other
//! actor whose channel closes.
//!
//! ## Observability
//!
//! [`setup_tracing`] initializes structured logging for the process. See the
//! [`tracing`] module for levels and sample output.

pub mod greeting_system;
pub mod tracing;

pub use self::greeting_system::*;
pub use self::tracing::*;
