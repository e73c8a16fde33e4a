pub mod loader;
pub mod presets;
pub mod schema;
pub mod template;

pub use loader::{get_config_path, load_config, save_config, Credentials};
pub use presets::Preset;
pub use schema::{
    Config, ContentCreatorConfig, ContentTypeSpec, LoggingConfig, ModelConfig, PlatformSpec,
    ResearchAgentConfig, ToolPrompts, DEFAULT_PLATFORM,
};
pub use template::render_template;
