pub mod audio_graph;
pub mod frame_scheduler;
pub mod media;
pub mod platform_adapter;
pub mod recorder;
pub mod session_observer;
