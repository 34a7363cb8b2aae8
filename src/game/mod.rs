pub mod ai;
pub mod constants;
pub mod food;
pub mod input;
pub mod math;
pub mod particles;
pub mod power_up;
pub mod services;
pub mod session;
pub mod snake;
pub mod timers;
pub mod types;
