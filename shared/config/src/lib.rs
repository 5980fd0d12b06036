pub use config::{AgentDescriptor, Config, Simulation, TargetDescriptor};
pub use load::{get, init, ConfigError, ConfigType};

mod config;
mod load;
