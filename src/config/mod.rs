pub mod core;
pub mod loader;
pub mod rendering;
pub mod window;

pub use self::core::AppConfig;
pub use loader::{load_from_path, load_or_create_config};
pub use rendering::{Exercise, RenderConfig};
pub use window::WindowConfig;
