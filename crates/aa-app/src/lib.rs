/// asciiart application layer: CLI, configuration resolution and the
/// render pipeline.
pub mod cli;
pub mod pipeline;
