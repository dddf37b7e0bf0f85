pub mod audio_session;
pub mod controller;
pub mod machine;
pub mod reaper;
pub mod visualizer;
