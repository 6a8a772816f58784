pub mod animation;
pub mod app;
pub mod config;
pub mod render;
pub mod scene;
pub mod window;

// Re-export commonly used types
pub use animation::ColorPulse;
pub use app::App;
pub use config::{AppConfig, Exercise};
pub use render::debug::{clear_pending_errors, report_and_check, CallSite, GlErrorRecord};
pub use render::{
    guarded_call, ErrorQueue, GlCallError, GlErrorKind, GlErrorQueue, ShaderError, ShaderProgram,
    ShaderSource, ShaderStage, SourceError, SplitPolicy,
};
pub use scene::Scene;
