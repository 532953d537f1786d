pub mod accumulator;
pub mod attribution;
pub mod exec;
pub mod pipeline;
pub mod probe;
pub mod report;
pub mod resolve;
pub mod sources;
pub mod widen;
pub mod workspace;
